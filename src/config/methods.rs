//! Fluent setters, file loading and validation for `ConversionConfig`

use std::collections::BTreeMap;
use std::path::Path;

use super::errors::ConfigError;
use super::types::ConversionConfig;

/// Widest counter a `u64` can fill
const MAX_KEY_WIDTH: usize = 20;

impl ConversionConfig {
    #[must_use]
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_key_width(mut self, width: usize) -> Self {
        self.key_width = width;
        self
    }

    #[must_use]
    pub fn with_strip_comments(mut self, strip: bool) -> Self {
        self.strip_comments = strip;
        self
    }

    #[must_use]
    pub fn with_max_input_bytes(mut self, limit: usize) -> Self {
        self.max_input_bytes = limit;
        self
    }

    /// Map one WordPress category slug, replacing any previous target.
    #[must_use]
    pub fn with_category(mut self, slug: impl Into<String>, target: impl Into<String>) -> Self {
        self.category_map.insert(slug.into(), target.into());
        self
    }

    /// Replace the whole category map.
    #[must_use]
    pub fn with_category_map(mut self, map: BTreeMap<String, String>) -> Self {
        self.category_map = map;
        self
    }

    #[must_use]
    pub fn with_document_type(mut self, document_type: impl Into<String>) -> Self {
        self.document_type = document_type.into();
        self
    }

    /// Load a JSON config file. Missing fields keep their defaults.
    ///
    /// The loaded config is validated before it is returned.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read,
    /// [`ConfigError::Parse`] if it is not valid JSON for this struct and
    /// [`ConfigError::Invalid`] if a value fails validation.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded conversion config");
        Ok(config)
    }

    /// Check that every value can drive a conversion.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.key_prefix.is_empty() {
            return Err(ConfigError::invalid("key_prefix", "must not be empty"));
        }
        if self.key_prefix.chars().any(char::is_whitespace) {
            return Err(ConfigError::invalid("key_prefix", "must not contain whitespace"));
        }
        if !(1..=MAX_KEY_WIDTH).contains(&self.key_width) {
            return Err(ConfigError::invalid(
                "key_width",
                format!("must be between 1 and {MAX_KEY_WIDTH}, got {}", self.key_width),
            ));
        }
        if self.max_input_bytes == 0 {
            return Err(ConfigError::invalid("max_input_bytes", "must be greater than zero"));
        }
        if self.document_type.trim().is_empty() {
            return Err(ConfigError::invalid("document_type", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::constants::MAX_HTML_SIZE;

    #[test]
    fn test_defaults_are_valid() {
        let config = ConversionConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.key_prefix(), "blk");
        assert_eq!(config.key_width(), 6);
        assert!(config.strip_comments());
        assert_eq!(config.max_input_bytes(), MAX_HTML_SIZE);
        assert_eq!(config.map_category("uncategorized"), Some("news"));
        assert_eq!(config.document_type(), "blogPost");
    }

    #[test]
    fn test_fluent_setters() {
        let config = ConversionConfig::default()
            .with_key_prefix("pt")
            .with_key_width(3)
            .with_strip_comments(false)
            .with_category("recipes", "food")
            .with_document_type("article");
        assert_eq!(config.key_prefix(), "pt");
        assert_eq!(config.key_width(), 3);
        assert!(!config.strip_comments());
        assert_eq!(config.map_category("recipes"), Some("food"));
        assert_eq!(config.map_category("uncategorized"), Some("news"));
        assert_eq!(config.document_type(), "article");

        let cleared = config.with_category_map(BTreeMap::new());
        assert!(cleared.category_map().is_empty());
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let cases = [
            (ConversionConfig::default().with_key_prefix(""), "key_prefix"),
            (ConversionConfig::default().with_key_prefix("a b"), "key_prefix"),
            (ConversionConfig::default().with_key_width(0), "key_width"),
            (ConversionConfig::default().with_key_width(21), "key_width"),
            (ConversionConfig::default().with_max_input_bytes(0), "max_input_bytes"),
            (ConversionConfig::default().with_document_type(" "), "document_type"),
        ];
        for (config, expected) in cases {
            match config.validate() {
                Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected),
                other => panic!("expected invalid {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_partial_json_keeps_defaults() -> Result<(), serde_json::Error> {
        let config: ConversionConfig = serde_json::from_str(r#"{"key_width": 4}"#)?;
        assert_eq!(config.key_width(), 4);
        assert_eq!(config.key_prefix(), "blk");
        assert_eq!(config.document_type(), "blogPost");
        Ok(())
    }
}
