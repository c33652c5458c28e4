//! Shared configuration constants for the converter
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Default key prefix: `blk`
///
/// Every block, span and mark definition key starts with this prefix,
/// e.g. `blk000042`.
pub const DEFAULT_KEY_PREFIX: &str = "blk";

/// Default zero-padding width of the key counter: 6 digits
///
/// Counters past `999999` simply grow wider; keys stay unique.
pub const DEFAULT_KEY_WIDTH: usize = 6;

/// Largest HTML fragment accepted at the file/stdin edge: 10 MB
///
/// WordPress `content:encoded` fields are rarely larger than a few hundred
/// kilobytes. Anything bigger is almost certainly a broken export.
pub const MAX_HTML_SIZE: usize = 10 * 1024 * 1024;

/// Default `_type` of assembled migration documents
pub const DEFAULT_DOCUMENT_TYPE: &str = "blogPost";

/// Fallback file name for uploaded images whose URL has no usable segment
pub const DEFAULT_IMAGE_FILENAME: &str = "image.jpg";
