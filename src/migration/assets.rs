//! Image asset resolution.
//!
//! Conversion leaves every image as an `imageRef` placeholder carrying the
//! source URL. [`resolve_images`] hands each URL to an [`AssetUploader`] and
//! swaps the placeholder for an `image` block that references the uploaded
//! asset. Images that cannot be uploaded are dropped from the body.

use std::future::Future;

use super::errors::MigrationError;
use crate::portable_text::{AssetReference, Block, ImageAssetBlock, ImageBlock};
use crate::utils::constants::DEFAULT_IMAGE_FILENAME;

/// Destination for image binaries.
///
/// Implementations fetch `url`, store it under `filename` and return the
/// asset id. `Ok(None)` means the image could not be fetched and should be
/// skipped; `Err` means the upload itself failed. Both drop the image.
pub trait AssetUploader: Send + Sync {
    fn upload_image(
        &self,
        url: &str,
        filename: &str,
    ) -> impl Future<Output = Result<Option<String>, MigrationError>> + Send;
}

/// Upload file name for `url`.
///
/// An explicit, non-empty `preferred` name wins; otherwise the last path
/// segment of the URL, falling back to `image.jpg`.
#[must_use]
pub fn image_filename(url: &str, preferred: Option<&str>) -> String {
    if let Some(name) = preferred.filter(|name| !name.is_empty()) {
        return name.to_string();
    }
    url.rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .unwrap_or(DEFAULT_IMAGE_FILENAME)
        .to_string()
}

/// Upload one image and return its asset id, logging and swallowing failures.
pub async fn upload_or_skip<U>(uploader: &U, url: &str, filename: &str) -> Option<String>
where
    U: AssetUploader,
{
    match uploader.upload_image(url, filename).await {
        Ok(Some(id)) => {
            tracing::debug!(url, asset = %id, "uploaded image");
            Some(id)
        }
        Ok(None) => {
            tracing::warn!(url, "image could not be fetched, dropping");
            None
        }
        Err(e) => {
            tracing::warn!(url, error = %e, "image upload failed, dropping");
            None
        }
    }
}

/// Replace every `imageRef` placeholder with an uploaded `image` block.
///
/// The resolved block keeps the placeholder's key. An empty alt text falls
/// back to `fallback_alt` (usually the post title). All other blocks pass
/// through unchanged and in order. Uploads run one at a time, in document
/// order.
pub async fn resolve_images<U>(
    blocks: Vec<Block>,
    uploader: &U,
    filename: Option<&str>,
    fallback_alt: &str,
) -> Vec<Block>
where
    U: AssetUploader,
{
    let mut resolved = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Image(image) => {
                if let Some(asset) = resolve_one(image, uploader, filename, fallback_alt).await {
                    resolved.push(Block::from(asset));
                }
            }
            other => resolved.push(other),
        }
    }
    resolved
}

async fn resolve_one<U>(
    image: ImageBlock,
    uploader: &U,
    filename: Option<&str>,
    fallback_alt: &str,
) -> Option<ImageAssetBlock>
where
    U: AssetUploader,
{
    let name = image_filename(&image.url, filename);
    let id = upload_or_skip(uploader, &image.url, &name).await?;
    let alt = if image.alt.is_empty() {
        fallback_alt.to_string()
    } else {
        image.alt
    };
    Some(ImageAssetBlock {
        key: image.key,
        asset: AssetReference { id },
        alt,
    })
}
