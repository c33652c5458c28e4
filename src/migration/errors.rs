use thiserror::Error;

/// Errors raised at the edges of a migration run.
///
/// Conversion itself never fails; these cover input limits, asset uploads
/// and post metadata.
#[derive(Error, Debug)]
pub enum MigrationError {
    #[error("Input of at least {size} bytes exceeds the {limit} byte limit")]
    InputTooLarge { size: usize, limit: usize },

    #[error("Failed to upload image {url}: {reason}")]
    Upload { url: String, reason: String },

    #[error("Document store error: {0}")]
    Store(String),

    #[error("Invalid publish date {value:?}: {source}")]
    InvalidDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },

    #[error("Failed to parse post record: {0}")]
    Record(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MigrationError {
    /// Upload failure reported by an [`AssetUploader`](super::AssetUploader).
    pub fn upload(url: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        Self::Upload {
            url: url.into(),
            reason: reason.to_string(),
        }
    }
}
