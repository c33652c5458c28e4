//! Core configuration types for Portable Text conversion
//!
//! This module contains the main `ConversionConfig` struct that controls key
//! generation, fragment preprocessing and document assembly.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::constants::{
    DEFAULT_DOCUMENT_TYPE, DEFAULT_KEY_PREFIX, DEFAULT_KEY_WIDTH, MAX_HTML_SIZE,
};

/// Main configuration struct for conversion and migration runs
///
/// Every field has a default, so a JSON file only needs the keys it changes:
///
/// ```json
/// { "key_prefix": "pt", "category_map": { "recipes": "food" } }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionConfig {
    /// Prefix of every generated `_key`
    pub(crate) key_prefix: String,
    /// Zero-padding width of the key counter
    pub(crate) key_width: usize,
    /// Remove `<!-- ... -->` comments (block-editor markers) before tokenizing
    pub(crate) strip_comments: bool,
    /// Largest fragment accepted when reading input from a file or stdin
    pub(crate) max_input_bytes: usize,
    /// WordPress category slug to target category value.
    ///
    /// Slugs missing from the map are dropped from assembled documents.
    pub(crate) category_map: BTreeMap<String, String>,
    /// `_type` of assembled post documents
    pub(crate) document_type: String,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            key_width: DEFAULT_KEY_WIDTH,
            strip_comments: true,
            max_input_bytes: MAX_HTML_SIZE,
            category_map: BTreeMap::from([("uncategorized".to_string(), "news".to_string())]),
            document_type: DEFAULT_DOCUMENT_TYPE.to_string(),
        }
    }
}
