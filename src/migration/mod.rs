//! WordPress to Sanity migration glue
//!
//! Everything around the converter that a real migration run needs:
//! size-limited input, image asset resolution through an
//! [`AssetUploader`], post document assembly and per-run counters.
//! Network access stays behind the [`AssetUploader`] and [`DocumentStore`]
//! traits.

pub mod assets;
pub mod document;
pub mod errors;
pub mod input;
pub mod run;
pub mod summary;

pub use assets::{AssetUploader, image_filename, resolve_images, upload_or_skip};
pub use document::{
    BlogPostDocument, FeaturedImage, PostRecord, Slug, build_document, map_categories,
    publish_date_rfc3339,
};
pub use errors::MigrationError;
pub use input::{check_fragment_size, read_fragment, read_fragment_file};
pub use run::{DocumentStore, migrate_post, migrate_posts};
pub use summary::{MigrationSummary, PostOutcome};
