//! Key generation for blocks, spans and mark definitions.
//!
//! Portable Text requires a `_key` on every array member. Keys only have to
//! be unique within one document, so a monotonically increasing counter is
//! enough. The counter has an explicit owner: a [`KeyCounter`] lives inside a
//! conversion session and is handed to block construction as `&mut`.
//!
//! Conversions that must draw from one sequence (for example several fields
//! merged into a single document on different threads) share a
//! [`SharedKeyCounter`], which serializes access behind a mutex.

use parking_lot::Mutex;
use std::sync::Arc;

use crate::utils::{DEFAULT_KEY_PREFIX, DEFAULT_KEY_WIDTH};

/// Source of unique keys.
///
/// Implemented by the built-in counters and by any `FnMut() -> String`
/// closure, so callers can inject their own scheme.
pub trait KeySource {
    /// Produce the next key. Must never return a key it returned before.
    fn next_key(&mut self) -> String;
}

impl<F> KeySource for F
where
    F: FnMut() -> String,
{
    fn next_key(&mut self) -> String {
        self()
    }
}

/// Monotonically increasing key counter rendering `<prefix><zero-padded n>`.
#[derive(Debug, Clone)]
pub struct KeyCounter {
    prefix: String,
    width: usize,
    next: u64,
}

impl Default for KeyCounter {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_PREFIX, DEFAULT_KEY_WIDTH)
    }
}

impl KeyCounter {
    #[must_use]
    pub fn new(prefix: impl Into<String>, width: usize) -> Self {
        Self {
            prefix: prefix.into(),
            width,
            next: 1,
        }
    }

    /// Resume numbering after `last`, e.g. when appending to a document
    /// whose highest key is already known.
    #[must_use]
    pub fn starting_after(mut self, last: u64) -> Self {
        self.next = last.saturating_add(1);
        self
    }

    /// Number of keys handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next - 1
    }

    fn format(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }
}

impl KeySource for KeyCounter {
    fn next_key(&mut self) -> String {
        let key = self.format(self.next);
        self.next += 1;
        key
    }
}

/// Cloneable handle to one key sequence shared across conversions.
///
/// Every clone draws from the same counter, so keys stay unique even when
/// outputs produced on different threads are merged later.
#[derive(Debug, Clone, Default)]
pub struct SharedKeyCounter {
    inner: Arc<Mutex<KeyCounter>>,
}

impl SharedKeyCounter {
    #[must_use]
    pub fn new(counter: KeyCounter) -> Self {
        Self {
            inner: Arc::new(Mutex::new(counter)),
        }
    }

    #[must_use]
    pub fn issued(&self) -> u64 {
        self.inner.lock().issued()
    }
}

impl From<KeyCounter> for SharedKeyCounter {
    fn from(counter: KeyCounter) -> Self {
        Self::new(counter)
    }
}

impl KeySource for SharedKeyCounter {
    fn next_key(&mut self) -> String {
        self.inner.lock().next_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_format() {
        let mut keys = KeyCounter::default();
        assert_eq!(keys.next_key(), "blk000001");
        assert_eq!(keys.next_key(), "blk000002");
        assert_eq!(keys.issued(), 2);
    }

    #[test]
    fn test_custom_prefix_and_overflowing_width() {
        let mut keys = KeyCounter::new("k", 2).starting_after(99);
        assert_eq!(keys.next_key(), "k100");
    }

    #[test]
    fn test_closure_key_source() {
        let mut n = 0;
        let mut source = || {
            n += 10;
            n.to_string()
        };
        assert_eq!(source.next_key(), "10");
        assert_eq!(source.next_key(), "20");
    }

    #[test]
    fn test_shared_counter_unique_across_threads() {
        let shared = SharedKeyCounter::default();
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let mut keys = shared.clone();
                std::thread::spawn(move || (0..250).map(|_| keys.next_key()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                assert!(seen.insert(key), "duplicate key");
            }
        }
        assert_eq!(seen.len(), 1000);
        assert_eq!(shared.issued(), 1000);
    }

    #[test]
    fn test_shared_counter_keeps_custom_scheme() {
        let shared = SharedKeyCounter::new(KeyCounter::new("pt", 3).starting_after(10));
        let handles: Vec<_> = (0..3)
            .map(|_| {
                let mut keys = shared.clone();
                std::thread::spawn(move || (0..20).map(|_| keys.next_key()).collect::<Vec<_>>())
            })
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for key in handle.join().unwrap() {
                assert!(key.starts_with("pt"), "unexpected key {key}");
                assert_eq!(key.len(), 5, "unexpected key {key}");
                assert!(seen.insert(key), "duplicate key");
            }
        }
        assert_eq!(seen.len(), 60);
        assert!(seen.contains("pt011") && seen.contains("pt070"));
        assert!(!seen.contains("pt010"));
        assert_eq!(shared.issued(), 70);
    }

    #[test]
    fn test_shared_counter_from_counter() {
        let mut shared = SharedKeyCounter::from(KeyCounter::new("x", 2));
        let mut other = shared.clone();
        assert_eq!(shared.next_key(), "x01");
        assert_eq!(other.next_key(), "x02");
        assert_eq!(shared.issued(), 2);
    }
}
