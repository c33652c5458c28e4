//! Migration stage tests: input limits, asset resolution, document assembly

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashMap;

use wp_portable_text::migration::{
    AssetUploader, BlogPostDocument, DocumentStore, MigrationError, PostRecord, migrate_post,
    migrate_posts, read_fragment_file,
};
use wp_portable_text::portable_text::Block;
use wp_portable_text::ConversionConfig;

mod common;
use common::gutenberg_post;

/// Uploader backed by a fixed URL to asset id table
struct TableUploader {
    assets: HashMap<&'static str, &'static str>,
    uploads: Mutex<Vec<String>>,
}

impl TableUploader {
    fn new(assets: &[(&'static str, &'static str)]) -> Self {
        Self {
            assets: assets.iter().copied().collect(),
            uploads: Mutex::new(Vec::new()),
        }
    }
}

impl AssetUploader for TableUploader {
    async fn upload_image(
        &self,
        url: &str,
        filename: &str,
    ) -> Result<Option<String>, MigrationError> {
        self.uploads.lock().push(filename.to_string());
        Ok(self.assets.get(url).map(|id| (*id).to_string()))
    }
}

#[derive(Default)]
struct VecStore {
    documents: Mutex<Vec<BlogPostDocument>>,
}

impl DocumentStore for VecStore {
    async fn find_by_slug(
        &self,
        document_type: &str,
        slug: &str,
    ) -> Result<Option<String>, MigrationError> {
        Ok(self
            .documents
            .lock()
            .iter()
            .position(|doc| doc.document_type == document_type && doc.slug.current == slug)
            .map(|index| format!("doc-{index}")))
    }

    async fn create(&self, document: &BlogPostDocument) -> Result<String, MigrationError> {
        if document.title.is_empty() {
            return Err(MigrationError::Store("title is required".to_string()));
        }
        let mut documents = self.documents.lock();
        documents.push(document.clone());
        Ok(format!("doc-{}", documents.len() - 1))
    }
}

fn welcome_post() -> PostRecord {
    PostRecord {
        wp_post_id: Some("7".to_string()),
        title: "Welcome".to_string(),
        slug: "welcome".to_string(),
        content: gutenberg_post(),
        excerpt: "A new start".to_string(),
        publish_date: "2024-01-15 09:00:00".to_string(),
        categories: vec!["uncategorized".to_string(), "uncategorized".to_string()],
        featured_image_url: Some("https://example.org/hero.jpg".to_string()),
    }
}

#[tokio::test]
async fn test_full_post_migration() {
    let uploader = TableUploader::new(&[
        ("https://example.org/wp-content/uploads/2024/01/team.jpg", "image-team"),
        ("https://example.org/hero.jpg", "image-hero"),
    ]);
    let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().unwrap();
    let document = migrate_post(&welcome_post(), &uploader, &ConversionConfig::default(), now)
        .await
        .unwrap();

    assert_eq!(document.body.len(), 7);
    assert!(document.unresolved_images().next().is_none());
    let Block::ImageAsset(team) = &document.body[4] else {
        panic!("expected resolved image at index 4");
    };
    assert_eq!(team.asset.id, "image-team");
    assert_eq!(team.alt, "The team");

    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["_type"], "blogPost");
    assert_eq!(value["slug"], json!({"_type": "slug", "current": "welcome"}));
    assert_eq!(value["publishDate"], "2024-01-15T09:00:00.000Z");
    assert_eq!(value["excerpt"], "A new start");
    assert_eq!(value["categories"], json!(["news"]));
    assert_eq!(
        value["featuredImage"],
        json!({"_type": "image", "asset": {"_type": "reference", "_ref": "image-hero"}, "alt": "Welcome"})
    );
    assert_eq!(value["body"][4]["_type"], "image");

    assert_eq!(
        uploader.uploads.lock().as_slice(),
        &["welcome-inline.jpg".to_string(), "welcome-featured.jpg".to_string()]
    );
}

#[tokio::test]
async fn test_unfetchable_featured_image_is_omitted() {
    let uploader = TableUploader::new(&[]);
    let document = migrate_post(&welcome_post(), &uploader, &ConversionConfig::default(), Utc::now())
        .await
        .unwrap();
    assert!(document.featured_image.is_none());
    assert_eq!(document.body.len(), 6);
    assert!(document.body.iter().all(|block| block.as_content().is_some()));
}

#[tokio::test]
async fn test_second_run_skips_existing_posts() {
    let uploader = TableUploader::new(&[]);
    let store = VecStore::default();
    let config = ConversionConfig::default();
    let untitled = PostRecord {
        slug: "untitled".to_string(),
        ..PostRecord::default()
    };
    let posts = vec![welcome_post(), untitled];

    let first = migrate_posts(&posts, &uploader, &store, &config, Utc::now()).await;
    assert_eq!((first.created, first.skipped, first.errors), (1, 0, 1));

    let second = migrate_posts(&posts, &uploader, &store, &config, Utc::now()).await;
    assert_eq!((second.created, second.skipped, second.errors), (0, 1, 1));
    assert_eq!(store.documents.lock().len(), 1);
}

#[test]
fn test_fragment_file_limit() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("post.html");
    std::fs::write(&path, gutenberg_post()).unwrap();

    let html = read_fragment_file(&path, 1 << 20).unwrap();
    assert_eq!(html, gutenberg_post());
    assert!(matches!(
        read_fragment_file(&path, 64),
        Err(MigrationError::InputTooLarge { limit: 64, .. })
    ));
    assert!(matches!(
        read_fragment_file(dir.path().join("missing.html"), 64),
        Err(MigrationError::Io(_))
    ));
}
