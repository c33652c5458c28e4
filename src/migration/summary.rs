use serde::Serialize;

/// What happened to one post during a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOutcome {
    Created,
    /// A document with the same slug already existed
    Skipped,
    Failed,
}

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MigrationSummary {
    pub created: usize,
    pub skipped: usize,
    pub errors: usize,
}

impl MigrationSummary {
    pub fn record(&mut self, outcome: PostOutcome) {
        match outcome {
            PostOutcome::Created => self.created += 1,
            PostOutcome::Skipped => self.skipped += 1,
            PostOutcome::Failed => self.errors += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.created + self.skipped + self.errors
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.errors > 0
    }

    pub fn log_report(&self) {
        tracing::info!(
            created = self.created,
            skipped = self.skipped,
            errors = self.errors,
            "migration complete"
        );
    }
}
