//! Post-by-post migration driver.

use chrono::{DateTime, Utc};
use std::future::Future;

use super::assets::{AssetUploader, image_filename, resolve_images, upload_or_skip};
use super::document::{BlogPostDocument, FeaturedImage, PostRecord, build_document};
use super::errors::MigrationError;
use super::input::check_fragment_size;
use super::summary::{MigrationSummary, PostOutcome};
use crate::config::ConversionConfig;
use crate::portable_text::{AssetReference, Converter};

/// Target dataset.
pub trait DocumentStore: Send + Sync {
    /// Id of an existing document of `document_type` with this slug.
    fn find_by_slug(
        &self,
        document_type: &str,
        slug: &str,
    ) -> impl Future<Output = Result<Option<String>, MigrationError>> + Send;

    /// Create the document and return its id.
    fn create(
        &self,
        document: &BlogPostDocument,
    ) -> impl Future<Output = Result<String, MigrationError>> + Send;
}

/// Convert one post and resolve its images.
///
/// Each post gets a fresh key sequence from `config`. The publish date is
/// checked before anything is uploaded.
///
/// # Errors
///
/// [`MigrationError::InputTooLarge`] for oversized content and
/// [`MigrationError::InvalidDate`] for an unparseable publish date. Failed
/// image uploads are not errors; those images are dropped.
pub async fn migrate_post<U>(
    post: &PostRecord,
    uploader: &U,
    config: &ConversionConfig,
    now: DateTime<Utc>,
) -> Result<BlogPostDocument, MigrationError>
where
    U: AssetUploader,
{
    check_fragment_size(&post.content, config.max_input_bytes())?;
    let mut document = build_document(post, Vec::new(), config, now)?;

    let blocks = Converter::from_config(config).convert(&post.content);
    let inline_name = post.inline_image_filename();
    document.body = resolve_images(blocks, uploader, inline_name.as_deref(), &post.title).await;

    let featured = match post.featured_image_url.as_deref().filter(|url| !url.is_empty()) {
        Some(url) => {
            tracing::debug!(slug = %post.slug, "uploading featured image");
            let name = image_filename(url, post.featured_image_filename().as_deref());
            upload_or_skip(uploader, url, &name).await.map(|id| FeaturedImage {
                asset: AssetReference { id },
                alt: post.title.clone(),
            })
        }
        None => None,
    };
    Ok(document.with_featured_image(featured))
}

/// Migrate `posts` in order, skipping slugs that already exist.
///
/// A failing post is logged and counted; the run continues with the next.
pub async fn migrate_posts<U, S>(
    posts: &[PostRecord],
    uploader: &U,
    store: &S,
    config: &ConversionConfig,
    now: DateTime<Utc>,
) -> MigrationSummary
where
    U: AssetUploader,
    S: DocumentStore,
{
    tracing::info!(posts = posts.len(), "starting migration");
    let mut summary = MigrationSummary::default();
    for post in posts {
        let outcome = migrate_one(post, uploader, store, config, now).await;
        summary.record(outcome);
    }
    summary.log_report();
    summary
}

async fn migrate_one<U, S>(
    post: &PostRecord,
    uploader: &U,
    store: &S,
    config: &ConversionConfig,
    now: DateTime<Utc>,
) -> PostOutcome
where
    U: AssetUploader,
    S: DocumentStore,
{
    match store.find_by_slug(config.document_type(), &post.slug).await {
        Ok(Some(existing)) => {
            tracing::info!(slug = %post.slug, existing = %existing, "already exists, skipping");
            return PostOutcome::Skipped;
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!(slug = %post.slug, error = %e, "existence check failed");
            return PostOutcome::Failed;
        }
    }

    let result = match migrate_post(post, uploader, config, now).await {
        Ok(document) => store.create(&document).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(id) => {
            tracing::info!(slug = %post.slug, id = %id, "created");
            PostOutcome::Created
        }
        Err(e) => {
            tracing::error!(slug = %post.slug, error = %e, "migration failed");
            PostOutcome::Failed
        }
    }
}
