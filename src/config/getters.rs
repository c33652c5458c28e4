//! Getter methods for `ConversionConfig`

use std::collections::BTreeMap;

use super::types::ConversionConfig;

impl ConversionConfig {
    #[must_use]
    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    #[must_use]
    pub fn key_width(&self) -> usize {
        self.key_width
    }

    #[must_use]
    pub fn strip_comments(&self) -> bool {
        self.strip_comments
    }

    #[must_use]
    pub fn max_input_bytes(&self) -> usize {
        self.max_input_bytes
    }

    #[must_use]
    pub fn category_map(&self) -> &BTreeMap<String, String> {
        &self.category_map
    }

    /// Target category for a WordPress category slug, if mapped.
    #[must_use]
    pub fn map_category(&self, slug: &str) -> Option<&str> {
        self.category_map.get(slug).map(String::as_str)
    }

    #[must_use]
    pub fn document_type(&self) -> &str {
        &self.document_type
    }
}
