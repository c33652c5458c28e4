pub mod config;
pub mod migration;
pub mod portable_text;
pub mod utils;

pub use config::{ConfigError, ConversionConfig};
pub use migration::{
    AssetUploader, BlogPostDocument, DocumentStore, MigrationError, MigrationSummary, PostRecord,
    build_document, migrate_post, migrate_posts, resolve_images,
};
pub use portable_text::{
    Block, ContentBlock, Converter, ImageBlock, InlineSpan, KeyCounter, KeySource, Mark,
    SharedKeyCounter, Span, convert, parse_inline, split_top_level,
};

/// Convert a WordPress HTML fragment with a fresh default key sequence.
///
/// Shorthand for `Converter::new().convert(html)`.
#[must_use]
pub fn html_to_portable_text(html: &str) -> Vec<Block> {
    Converter::new().convert(html)
}
