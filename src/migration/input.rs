//! Size-limited fragment input.

use std::io::Read;
use std::path::Path;

use super::errors::MigrationError;

/// Read an HTML fragment, refusing anything larger than `limit` bytes.
///
/// At most `limit + 1` bytes are pulled from `reader`, so an oversized
/// stream is rejected without buffering all of it.
///
/// # Errors
///
/// [`MigrationError::InputTooLarge`] past the limit, [`MigrationError::Io`]
/// on read failures or invalid UTF-8.
pub fn read_fragment<R: Read>(reader: R, limit: usize) -> Result<String, MigrationError> {
    let mut html = String::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(cap).read_to_string(&mut html)?;
    check_fragment_size(&html, limit)?;
    Ok(html)
}

/// [`read_fragment`] from a file path.
///
/// # Errors
///
/// See [`read_fragment`].
pub fn read_fragment_file(path: impl AsRef<Path>, limit: usize) -> Result<String, MigrationError> {
    let file = std::fs::File::open(path.as_ref())?;
    read_fragment(file, limit)
}

/// Reject a fragment already in memory when it exceeds `limit` bytes.
///
/// # Errors
///
/// [`MigrationError::InputTooLarge`] past the limit.
pub fn check_fragment_size(html: &str, limit: usize) -> Result<(), MigrationError> {
    if html.len() > limit {
        return Err(MigrationError::InputTooLarge {
            size: html.len(),
            limit,
        });
    }
    Ok(())
}
