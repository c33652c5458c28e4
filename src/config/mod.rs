//! Configuration module for Portable Text conversion
//!
//! This module provides the `ConversionConfig` struct, its fluent setters and
//! JSON file loading with validation and sensible defaults.

// Sub-modules
pub mod errors;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use errors::ConfigError;
pub use types::ConversionConfig;
