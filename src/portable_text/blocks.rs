//! Portable Text output model.
//!
//! The shapes serialize directly into the JSON Sanity expects for a
//! `body` array: every member carries `_type` and `_key`, spans reference
//! link annotations through `markDefs`.

use serde::{Deserialize, Serialize};

use super::inline::InlineSpan;
use super::keys::KeySource;

/// Paragraph style of a text block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockStyle {
    H2,
    H3,
    H4,
    Normal,
    Blockquote,
}

impl BlockStyle {
    /// Style for an `<hN>` element. Only levels 2 to 4 are modeled.
    #[must_use]
    pub fn heading(level: u8) -> Option<Self> {
        match level {
            2 => Some(Self::H2),
            3 => Some(Self::H3),
            4 => Some(Self::H4),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::H2 => "h2",
            Self::H3 => "h3",
            Self::H4 => "h4",
            Self::Normal => "normal",
            Self::Blockquote => "blockquote",
        }
    }
}

/// List flavour of a list-item block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListItem {
    Bullet,
    Number,
}

/// A text run inside a block. `marks` holds decorator names (`strong`, `em`)
/// followed by the keys of any mark definitions that apply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "span")]
pub struct Span {
    #[serde(rename = "_key")]
    pub key: String,
    pub text: String,
    pub marks: Vec<String>,
}

/// Block-scoped link annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "link")]
pub struct MarkDefinition {
    #[serde(rename = "_key")]
    pub key: String,
    pub href: String,
    #[serde(rename = "openInNewTab")]
    pub open_in_new_tab: bool,
}

/// One paragraph, heading, quote or list item.
///
/// **INVARIANT:** `children` is never empty and `level` is present exactly
/// when `list_item` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(rename = "_key")]
    pub key: String,
    pub style: BlockStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list_item: Option<ListItem>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    pub mark_defs: Vec<MarkDefinition>,
    pub children: Vec<Span>,
}

impl ContentBlock {
    /// Assemble a block from resolved inline spans.
    ///
    /// Keys are drawn in reading order: the block first, then for each link
    /// its mark definition followed by its span. Links become a
    /// [`MarkDefinition`] owned by this block plus a span whose marks end
    /// with the definition key.
    pub fn assemble<K>(style: BlockStyle, spans: Vec<InlineSpan>, keys: &mut K) -> Self
    where
        K: KeySource + ?Sized,
    {
        let mut block = Self {
            key: keys.next_key(),
            style,
            list_item: None,
            level: None,
            mark_defs: Vec::new(),
            children: Vec::with_capacity(spans.len().max(1)),
        };

        for span in spans {
            match span {
                InlineSpan::Text { text, marks } => {
                    block.children.push(Span {
                        key: keys.next_key(),
                        text,
                        marks: marks.iter().map(|m| m.as_str().to_string()).collect(),
                    });
                }
                InlineSpan::Link {
                    text,
                    href,
                    new_tab,
                    marks,
                } => {
                    let mark_key = keys.next_key();
                    let mut span_marks: Vec<String> =
                        marks.iter().map(|m| m.as_str().to_string()).collect();
                    span_marks.push(mark_key.clone());
                    block.mark_defs.push(MarkDefinition {
                        key: mark_key,
                        href,
                        open_in_new_tab: new_tab,
                    });
                    block.children.push(Span {
                        key: keys.next_key(),
                        text,
                        marks: span_marks,
                    });
                }
            }
        }

        if block.children.is_empty() {
            block.children.push(Span {
                key: keys.next_key(),
                text: String::new(),
                marks: Vec::new(),
            });
        }

        block
    }

    /// Assemble a flat (level 1) list-item block.
    pub fn list_item<K>(list_item: ListItem, spans: Vec<InlineSpan>, keys: &mut K) -> Self
    where
        K: KeySource + ?Sized,
    {
        let mut block = Self::assemble(BlockStyle::Normal, spans, keys);
        block.list_item = Some(list_item);
        block.level = Some(1);
        block
    }

    /// Concatenated text of all children.
    #[must_use]
    pub fn plain_text(&self) -> String {
        self.children.iter().map(|s| s.text.as_str()).collect()
    }

    /// Look up a mark definition by key.
    #[must_use]
    pub fn mark_def(&self, key: &str) -> Option<&MarkDefinition> {
        self.mark_defs.iter().find(|d| d.key == key)
    }
}

/// Placeholder for an image that still has to be uploaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageBlock {
    #[serde(rename = "_key")]
    pub key: String,
    pub url: String,
    pub alt: String,
}

/// Reference to an uploaded asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type", rename = "reference")]
pub struct AssetReference {
    #[serde(rename = "_ref")]
    pub id: String,
}

/// Image whose binary has been uploaded and resolved to an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAssetBlock {
    #[serde(rename = "_key")]
    pub key: String,
    pub asset: AssetReference,
    pub alt: String,
}

/// Member of a Portable Text `body` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "_type")]
pub enum Block {
    #[serde(rename = "block")]
    Content(ContentBlock),
    #[serde(rename = "imageRef")]
    Image(ImageBlock),
    #[serde(rename = "image")]
    ImageAsset(ImageAssetBlock),
}

impl Block {
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Content(b) => &b.key,
            Self::Image(b) => &b.key,
            Self::ImageAsset(b) => &b.key,
        }
    }

    #[must_use]
    pub fn as_content(&self) -> Option<&ContentBlock> {
        match self {
            Self::Content(b) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_image(&self) -> Option<&ImageBlock> {
        match self {
            Self::Image(b) => Some(b),
            _ => None,
        }
    }
}

impl From<ContentBlock> for Block {
    fn from(block: ContentBlock) -> Self {
        Self::Content(block)
    }
}

impl From<ImageBlock> for Block {
    fn from(block: ImageBlock) -> Self {
        Self::Image(block)
    }
}

impl From<ImageAssetBlock> for Block {
    fn from(block: ImageAssetBlock) -> Self {
        Self::ImageAsset(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portable_text::inline::Mark;
    use crate::portable_text::keys::KeyCounter;
    use serde_json::json;

    #[test]
    fn test_empty_block_gets_placeholder_span() {
        let mut keys = KeyCounter::default();
        let block = ContentBlock::assemble(BlockStyle::Normal, Vec::new(), &mut keys);
        assert_eq!(block.children.len(), 1);
        assert_eq!(block.children[0].text, "");
        assert_eq!(block.key, "blk000001");
        assert_eq!(block.children[0].key, "blk000002");
    }

    #[test]
    fn test_link_becomes_mark_definition() {
        let mut keys = KeyCounter::default();
        let spans = vec![
            InlineSpan::text("See "),
            InlineSpan::Link {
                text: "docs".into(),
                href: "https://e.org".into(),
                new_tab: true,
                marks: vec![Mark::Em],
            },
        ];
        let block = ContentBlock::assemble(BlockStyle::Normal, spans, &mut keys);

        assert_eq!(block.mark_defs.len(), 1);
        let def = &block.mark_defs[0];
        assert_eq!(def.key, "blk000003");
        assert!(def.open_in_new_tab);
        assert_eq!(block.children[1].marks, vec!["em".to_string(), def.key.clone()]);
        assert_eq!(block.children[1].key, "blk000004");
        assert_eq!(block.mark_def("blk000003"), Some(def));
    }

    #[test]
    fn test_serialized_shape() {
        let mut keys = KeyCounter::default();
        let block = ContentBlock::list_item(
            ListItem::Number,
            vec![InlineSpan::text("One")],
            &mut keys,
        );
        let value = serde_json::to_value(Block::from(block)).unwrap();
        assert_eq!(
            value,
            json!({
                "_type": "block",
                "_key": "blk000001",
                "style": "normal",
                "listItem": "number",
                "level": 1,
                "markDefs": [],
                "children": [
                    {"_type": "span", "_key": "blk000002", "text": "One", "marks": []}
                ]
            })
        );
    }

    #[test]
    fn test_heading_style_names() {
        for (level, name) in [(2, "h2"), (3, "h3"), (4, "h4")] {
            let style = BlockStyle::heading(level).unwrap();
            assert_eq!(style.as_str(), name);
            assert_eq!(serde_json::to_value(style).unwrap(), json!(name));
        }
        assert_eq!(BlockStyle::heading(1), None);
        assert_eq!(BlockStyle::heading(5), None);
    }

    #[test]
    fn test_image_placeholder_shape() {
        let block = Block::Image(ImageBlock {
            key: "blk000009".into(),
            url: "a.jpg".into(),
            alt: String::new(),
        });
        let value = serde_json::to_value(&block).unwrap();
        assert_eq!(
            value,
            json!({"_type": "imageRef", "_key": "blk000009", "url": "a.jpg", "alt": ""})
        );
        let back: Block = serde_json::from_value(value).unwrap();
        assert_eq!(back, block);
    }
}
