//! Block classification.
//!
//! Each top-level element produced by the tokenizer is matched against its
//! outer tag and turned into zero or more blocks. Anything unrecognized ends
//! up as a stripped-text paragraph, so classification never fails.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::blocks::{Block, BlockStyle, ContentBlock, ImageBlock, ListItem};
use super::entities::{decode_entities, strip_html, strip_tags};
use super::inline::{InlineSpan, parse_inline};
use super::keys::KeySource;
use super::table::table_blocks;

// ============================================================================
// Element patterns
// ============================================================================

static TAG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([a-zA-Z][a-zA-Z0-9]*)").expect("TAG_NAME_RE: hardcoded regex is valid")
});

/// Captures: (1) heading level, (2) inner markup
static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^<h([2-4])[^>]*>(.*?)</h[2-4]>").expect("HEADING_RE: hardcoded regex is valid")
});

static PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^<p[^>]*>(.*?)</p>$").expect("PARAGRAPH_RE: hardcoded regex is valid")
});

static BLOCKQUOTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^<blockquote[^>]*>(.*?)</blockquote>$")
        .expect("BLOCKQUOTE_RE: hardcoded regex is valid")
});

/// Paragraphs anywhere inside a quote
static INNER_PARAGRAPH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<p(?:\s[^>]*)?>(.*?)</p>").expect("INNER_PARAGRAPH_RE: hardcoded regex is valid")
});

static LIST_ITEM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<li(?:\s[^>]*)?>(.*?)</li>").expect("LIST_ITEM_RE: hardcoded regex is valid")
});

static IMG_ONLY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<img[^>]+>$").expect("IMG_ONLY_RE: hardcoded regex is valid"));

static IMG_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img[^>]+>").expect("IMG_TAG_RE: hardcoded regex is valid"));

static TABLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<table\b").expect("TABLE_RE: hardcoded regex is valid"));

/// Captures: (1) double-quoted or (2) single-quoted value
static IMG_SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)src\s*=\s*(?:"([^"]+)"|'([^']+)')"#)
        .expect("IMG_SRC_RE: hardcoded regex is valid")
});

/// Captures: (1) double-quoted or (2) single-quoted value
static IMG_ALT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)alt\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
        .expect("IMG_ALT_RE: hardcoded regex is valid")
});

// ============================================================================
// Classification
// ============================================================================

/// Which rule handles a top-level element. Rules are tried in declaration
/// order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Heading,
    Paragraph,
    List(ListItem),
    Blockquote,
    HorizontalRule,
    Image,
    Table,
    Fallback,
}

/// Decide how an element will be converted.
#[must_use]
pub fn element_kind(element: &str) -> ElementKind {
    if HEADING_RE.is_match(element) {
        return ElementKind::Heading;
    }

    let tag = TAG_NAME_RE
        .captures(element)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_ascii_lowercase());

    match tag.as_deref() {
        // `<pre>` and other `p`-prefixed tags resolve inline like paragraphs.
        Some(name) if name.starts_with('p') => ElementKind::Paragraph,
        Some("ul") => ElementKind::List(ListItem::Bullet),
        Some("ol") => ElementKind::List(ListItem::Number),
        Some("blockquote") => ElementKind::Blockquote,
        Some("hr") => ElementKind::HorizontalRule,
        Some("img" | "figure") => ElementKind::Image,
        _ if TABLE_RE.is_match(element) => ElementKind::Table,
        _ => ElementKind::Fallback,
    }
}

/// Convert one top-level element into blocks.
///
/// `element` is expected to be trimmed; empty input yields nothing.
pub fn classify_element<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let element = element.trim();
    if element.is_empty() {
        return Vec::new();
    }

    let kind = element_kind(element);
    tracing::trace!(?kind, len = element.len(), "classifying element");

    match kind {
        ElementKind::Heading => heading(element, keys),
        ElementKind::Paragraph => paragraph(element, keys),
        ElementKind::List(list_item) => list(element, list_item, keys),
        ElementKind::Blockquote => blockquote(element, keys),
        ElementKind::HorizontalRule => Vec::new(),
        ElementKind::Image => standalone_image(element, keys),
        ElementKind::Table => table_blocks(element, keys),
        ElementKind::Fallback => fallback(element, keys),
    }
}

fn heading<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let Some(caps) = HEADING_RE.captures(element) else {
        return fallback(element, keys);
    };
    let style = caps
        .get(1)
        .and_then(|m| m.as_str().parse::<u8>().ok())
        .and_then(BlockStyle::heading)
        .unwrap_or(BlockStyle::Normal);
    let inner = group(&caps, 2);
    vec![ContentBlock::assemble(style, parse_inline(inner), keys).into()]
}

fn paragraph<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let inner = PARAGRAPH_RE
        .captures(element)
        .map_or(element, |caps| group(&caps, 1))
        .trim();
    if inner.is_empty() {
        return Vec::new();
    }

    if IMG_ONLY_RE.is_match(inner) {
        return image_block(inner, keys).into_iter().map(Block::from).collect();
    }

    vec![ContentBlock::assemble(BlockStyle::Normal, parse_inline(inner), keys).into()]
}

fn list<K>(element: &str, list_item: ListItem, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    LIST_ITEM_RE
        .captures_iter(element)
        .map(|caps| {
            let item = group(&caps, 1).trim();
            Block::from(ContentBlock::list_item(list_item, parse_inline(item), &mut *keys))
        })
        .collect()
}

fn blockquote<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let inner = BLOCKQUOTE_RE
        .captures(element)
        .map_or(element, |caps| group(&caps, 1))
        .trim();

    let paragraphs: Vec<&str> = INNER_PARAGRAPH_RE
        .captures_iter(inner)
        .map(|caps| group(&caps, 1).trim())
        .collect();

    let text = if paragraphs.is_empty() {
        strip_tags(inner).trim().to_string()
    } else {
        paragraphs.join(" ").trim().to_string()
    };
    if text.is_empty() {
        return Vec::new();
    }

    vec![ContentBlock::assemble(BlockStyle::Blockquote, parse_inline(&text), keys).into()]
}

fn standalone_image<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let Some(tag) = IMG_TAG_RE.find(element) else {
        tracing::debug!("figure without an image, skipping");
        return Vec::new();
    };
    image_block(tag.as_str(), keys).into_iter().map(Block::from).collect()
}

fn fallback<K>(element: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let text = strip_html(element);
    let text = text.trim();
    if text.is_empty() {
        return Vec::new();
    }
    tracing::debug!(len = text.len(), "unrecognized element, keeping stripped text");
    vec![ContentBlock::assemble(BlockStyle::Normal, vec![InlineSpan::text(text)], keys).into()]
}

/// Build an image placeholder from an `<img>` tag. Tags without a `src`
/// produce nothing.
pub fn image_block<K>(img_tag: &str, keys: &mut K) -> Option<ImageBlock>
where
    K: KeySource + ?Sized,
{
    let Some(url) = IMG_SRC_RE.captures(img_tag).map(|caps| quoted_value(&caps)) else {
        tracing::warn!(tag = img_tag, "image without src, dropping");
        return None;
    };
    let alt = IMG_ALT_RE
        .captures(img_tag)
        .map(|caps| decode_entities(quoted_value(&caps)).into_owned())
        .unwrap_or_default();

    Some(ImageBlock {
        key: keys.next_key(),
        url: decode_entities(url).into_owned(),
        alt,
    })
}

fn group<'h>(caps: &Captures<'h>, index: usize) -> &'h str {
    caps.get(index).map_or("", |m| m.as_str())
}

fn quoted_value<'h>(caps: &Captures<'h>) -> &'h str {
    caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str())
}
