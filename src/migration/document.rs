//! Post document assembly.
//!
//! A [`PostRecord`] is the flattened view of one published WordPress post.
//! [`build_document`] turns it, together with its converted body, into the
//! Sanity document that gets created in the target dataset.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use super::errors::MigrationError;
use crate::config::ConversionConfig;
use crate::portable_text::{AssetReference, Block};

/// `wp:post_date_gmt` layout
const SPACE_SEPARATED: &str = "%Y-%m-%d %H:%M:%S";
const T_SEPARATED: &str = "%Y-%m-%dT%H:%M:%S";

/// WordPress writes this for posts that never had a GMT date
const ZERO_DATE: &str = "0000-00-00 00:00:00";

/// One published WordPress post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PostRecord {
    pub wp_post_id: Option<String>,
    pub title: String,
    pub slug: String,
    /// Raw `content:encoded` HTML
    pub content: String,
    pub excerpt: String,
    /// GMT publish date as `YYYY-MM-DD HH:MM:SS`
    pub publish_date: String,
    /// WordPress category slugs (nicenames)
    pub categories: Vec<String>,
    pub featured_image_url: Option<String>,
}

impl PostRecord {
    /// Parse a single post from JSON.
    ///
    /// # Errors
    ///
    /// [`MigrationError::Record`] when the JSON does not describe a post.
    pub fn from_json_str(json: &str) -> Result<Self, MigrationError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Upload file name for images inlined in the body.
    #[must_use]
    pub fn inline_image_filename(&self) -> Option<String> {
        (!self.slug.is_empty()).then(|| format!("{}-inline.jpg", self.slug))
    }

    /// Upload file name for the featured image.
    #[must_use]
    pub fn featured_image_filename(&self) -> Option<String> {
        (!self.slug.is_empty()).then(|| format!("{}-featured.jpg", self.slug))
    }
}

/// `slug` field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "slug")]
pub struct Slug {
    pub current: String,
}

/// Document-level image, e.g. the featured image. Unlike body images it
/// carries no `_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "image")]
pub struct FeaturedImage {
    pub asset: AssetReference,
    pub alt: String,
}

/// Document ready to be created in the target dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostDocument {
    #[serde(rename = "_type")]
    pub document_type: String,
    pub title: String,
    pub slug: Slug,
    /// RFC 3339, UTC
    pub publish_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    pub body: Vec<Block>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured_image: Option<FeaturedImage>,
}

impl BlogPostDocument {
    #[must_use]
    pub fn with_featured_image(mut self, image: Option<FeaturedImage>) -> Self {
        self.featured_image = image;
        self
    }

    /// Placeholders still waiting for an upload.
    pub fn unresolved_images(&self) -> impl Iterator<Item = &str> {
        self.body
            .iter()
            .filter_map(Block::as_image)
            .map(|image| image.url.as_str())
    }
}

/// Convert a GMT `YYYY-MM-DD HH:MM:SS` timestamp to RFC 3339 with a `Z`
/// suffix and millisecond precision. Empty and all-zero dates use `now`.
///
/// # Errors
///
/// [`MigrationError::InvalidDate`] for anything else that does not parse.
pub fn publish_date_rfc3339(gmt: &str, now: DateTime<Utc>) -> Result<String, MigrationError> {
    let gmt = gmt.trim();
    let timestamp = if gmt.is_empty() || gmt == ZERO_DATE {
        now
    } else {
        parse_gmt(gmt)?
    };
    Ok(timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn parse_gmt(value: &str) -> Result<DateTime<Utc>, MigrationError> {
    NaiveDateTime::parse_from_str(value, SPACE_SEPARATED)
        .or_else(|_| NaiveDateTime::parse_from_str(value, T_SEPARATED))
        .map(|naive| naive.and_utc())
        .map_err(|source| MigrationError::InvalidDate {
            value: value.to_string(),
            source,
        })
}

/// Map WordPress category slugs to target categories.
///
/// Unmapped slugs are dropped and duplicates collapse to their first
/// occurrence.
#[must_use]
pub fn map_categories(slugs: &[String], config: &ConversionConfig) -> Vec<String> {
    let mut mapped: Vec<String> = Vec::new();
    for slug in slugs {
        match config.map_category(slug) {
            Some(target) if !mapped.iter().any(|m| m == target) => mapped.push(target.to_string()),
            Some(_) => {}
            None => tracing::debug!(slug = %slug, "unmapped category, skipping"),
        }
    }
    mapped
}

/// Assemble the document for `post` around an already converted `body`.
///
/// The featured image is left unset; attach it with
/// [`BlogPostDocument::with_featured_image`] once uploaded.
///
/// # Errors
///
/// [`MigrationError::InvalidDate`] when the publish date does not parse.
pub fn build_document(
    post: &PostRecord,
    body: Vec<Block>,
    config: &ConversionConfig,
    now: DateTime<Utc>,
) -> Result<BlogPostDocument, MigrationError> {
    let publish_date = publish_date_rfc3339(&post.publish_date, now)?;
    Ok(BlogPostDocument {
        document_type: config.document_type().to_string(),
        title: post.title.clone(),
        slug: Slug {
            current: post.slug.clone(),
        },
        publish_date,
        excerpt: (!post.excerpt.is_empty()).then(|| post.excerpt.clone()),
        categories: map_categories(&post.categories, config),
        body,
        featured_image: None,
    })
}
