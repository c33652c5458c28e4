//! HTML to Portable Text conversion pipeline
//!
//! This module turns a WordPress post body into Sanity Portable Text blocks:
//! 1. Prepare the fragment (strip block-editor comments, trim)
//! 2. Split it into top-level elements with a depth-tracking scanner
//! 3. Classify each element (heading, paragraph, list, quote, image, table)
//! 4. Resolve inline markup into marked spans and link annotations
//!
//! Every stage degrades instead of failing: unknown blocks become stripped
//! text paragraphs, unknown inline tags are elided and stray `<` characters
//! are skipped. Conversion is total and returns no `Result`.
//!
//! # Usage
//!
//! ```rust
//! # use wp_portable_text::portable_text::{Converter, Block};
//! let mut converter = Converter::new();
//! let blocks = converter.convert("<!-- wp:paragraph --><p>Hello <strong>there</strong></p><!-- /wp:paragraph -->");
//! assert_eq!(blocks.len(), 1);
//! let Block::Content(block) = &blocks[0] else { unreachable!() };
//! assert_eq!(block.plain_text(), "Hello there");
//! ```
//!
//! ## Shared key sequence
//!
//! ```rust
//! # use wp_portable_text::portable_text::{convert, SharedKeyCounter};
//! let keys = SharedKeyCounter::default();
//! let body = convert("<p>body</p>", &mut keys.clone());
//! let excerpt = convert("<p>excerpt</p>", &mut keys.clone());
//! assert_ne!(body[0].key(), excerpt[0].key());
//! ```

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

pub mod blocks;
pub mod classifier;
pub mod entities;
pub mod inline;
pub mod keys;
pub mod table;
pub mod tokenizer;

pub use blocks::{
    AssetReference, Block, BlockStyle, ContentBlock, ImageAssetBlock, ImageBlock, ListItem,
    MarkDefinition, Span,
};
pub use classifier::{ElementKind, classify_element, element_kind};
pub use entities::{decode_entities, strip_html, strip_tags};
pub use inline::{InlineSpan, Mark, parse_inline};
pub use keys::{KeyCounter, KeySource, SharedKeyCounter};
pub use tokenizer::{TopLevelElements, split_top_level};

use crate::config::ConversionConfig;

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("COMMENT_RE: hardcoded regex is valid"));

const COMMENT_OPEN: &str = "<!--";
const COMMENT_CLOSE: &str = "-->";

/// Remove HTML comments (Gutenberg `<!-- wp:... -->` markers included) and
/// surrounding whitespace.
///
/// Text left around a removed comment can join into a new `<!--`; that one is
/// removed as well, so preparing a prepared fragment returns it unchanged.
#[must_use]
pub fn prepare_fragment(html: &str) -> Cow<'_, str> {
    let stripped = match COMMENT_RE.replace_all(html, "") {
        Cow::Borrowed(s) => return Cow::Borrowed(s.trim()),
        Cow::Owned(s) => s,
    };
    if COMMENT_RE.is_match(&stripped) {
        tracing::debug!("removing comments formed by stripping");
        return Cow::Owned(strip_joined_comments(&stripped).trim().to_string());
    }
    Cow::Owned(stripped.trim().to_string())
}

/// Single left-to-right pass that also drops comments whose opener only
/// appears once an earlier comment is gone.
fn strip_joined_comments(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    // Byte offset in `out` of the comment currently open.
    let mut open: Option<usize> = None;
    for ch in html.chars() {
        out.push(ch);
        match open {
            None if out.ends_with(COMMENT_OPEN) => {
                open = Some(out.len() - COMMENT_OPEN.len());
            }
            Some(start)
                if out.ends_with(COMMENT_CLOSE)
                    && out.len() - COMMENT_CLOSE.len() >= start + COMMENT_OPEN.len() =>
            {
                out.truncate(start);
                open = None;
            }
            _ => {}
        }
    }
    out
}

/// Convert an HTML fragment into Portable Text blocks.
///
/// Comments are stripped first. Keys for every block, span and mark
/// definition are drawn from `keys` in document order.
pub fn convert<K>(html: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let fragment = prepare_fragment(html);
    convert_prepared(&fragment, keys)
}

/// Convert a fragment that has already been cleaned and trimmed.
pub fn convert_prepared<K>(fragment: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let mut blocks = Vec::new();
    let mut elements = 0usize;
    for element in split_top_level(fragment) {
        elements += 1;
        blocks.extend(classify_element(element, keys));
    }
    tracing::debug!(elements, blocks = blocks.len(), "converted fragment");
    blocks
}

/// Conversion session.
///
/// Owns the key source for the lifetime of one output document, so keys
/// stay unique across every field converted through it. A session is not
/// meant to be shared between threads; use a [`SharedKeyCounter`] as the
/// key source when conversions run concurrently but must not collide.
#[derive(Debug, Clone)]
pub struct Converter<K = KeyCounter> {
    keys: K,
    strip_comments: bool,
}

impl Default for Converter<KeyCounter> {
    fn default() -> Self {
        Self::new()
    }
}

impl Converter<KeyCounter> {
    /// Session with the default `blk000001` key scheme.
    #[must_use]
    pub fn new() -> Self {
        Self::with_keys(KeyCounter::default())
    }

    /// Session whose key scheme and preprocessing follow `config`.
    #[must_use]
    pub fn from_config(config: &ConversionConfig) -> Self {
        Self::with_keys(KeyCounter::new(config.key_prefix(), config.key_width()))
            .with_strip_comments(config.strip_comments())
    }
}

impl<K: KeySource> Converter<K> {
    #[must_use]
    pub fn with_keys(keys: K) -> Self {
        Self {
            keys,
            strip_comments: true,
        }
    }

    /// Disable comment stripping for input that is known to be clean.
    #[must_use]
    pub fn with_strip_comments(mut self, strip_comments: bool) -> Self {
        self.strip_comments = strip_comments;
        self
    }

    /// Convert one fragment, drawing keys from this session.
    pub fn convert(&mut self, html: &str) -> Vec<Block> {
        if self.strip_comments {
            convert(html, &mut self.keys)
        } else {
            convert_prepared(html.trim(), &mut self.keys)
        }
    }

    /// Draw a key from the session, e.g. for blocks assembled by hand.
    pub fn next_key(&mut self) -> String {
        self.keys.next_key()
    }

    #[must_use]
    pub fn keys(&self) -> &K {
        &self.keys
    }

    #[must_use]
    pub fn into_keys(self) -> K {
        self.keys
    }
}
