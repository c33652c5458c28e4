//! Inline markup resolution.
//!
//! Turns the inner HTML of one block into ordered [`InlineSpan`]s. Only
//! `<br>`, `<strong>`/`<b>`, `<em>`/`<i>` and `<a href>` are understood;
//! everything else shaped like a tag is dropped without looking inside.
//!
//! # Progress guarantee
//!
//! Every step consumes at least one byte. Closing-tag searches that fail are
//! remembered for the rest of the scan (a closer missing after position `p`
//! is missing after every later position too), and tag matching stops once
//! the scan is past the last `>`. Malformed input therefore cannot make the
//! resolver rescan the same tail over and over.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use super::entities::{decode_entities, strip_html};

static BR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^<br\s*/?>").expect("BR_RE: hardcoded regex is valid"));

static STRONG_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</strong>").expect("STRONG_CLOSE_RE: hardcoded regex is valid")
});

static B_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</b>").expect("B_CLOSE_RE: hardcoded regex is valid"));

static EM_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</em>").expect("EM_CLOSE_RE: hardcoded regex is valid"));

static I_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</i>").expect("I_CLOSE_RE: hardcoded regex is valid"));

static A_CLOSE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</a>").expect("A_CLOSE_RE: hardcoded regex is valid"));

/// Opening anchor with an `href` in either quote style.
/// Captures: (1) href value
static ANCHOR_OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)^<a\s[^>]*href=["']([^"']*)["'][^>]*>"#)
        .expect("ANCHOR_OPEN_RE: hardcoded regex is valid")
});

static ANY_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^<[^>]+>").expect("ANY_TAG_RE: hardcoded regex is valid"));

/// Inline decorator applied to a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Strong,
    Em,
}

impl Mark {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Strong => "strong",
            Self::Em => "em",
        }
    }
}

/// One resolved run of inline content.
///
/// Marks keep insertion order, innermost first. Nested emphasis of the same
/// kind may repeat a mark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineSpan {
    Text {
        text: String,
        marks: Vec<Mark>,
    },
    Link {
        text: String,
        href: String,
        new_tab: bool,
        marks: Vec<Mark>,
    },
}

impl InlineSpan {
    /// Unmarked text span.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    #[must_use]
    pub fn as_text(&self) -> &str {
        match self {
            Self::Text { text, .. } | Self::Link { text, .. } => text,
        }
    }

    #[must_use]
    pub fn marks(&self) -> &[Mark] {
        match self {
            Self::Text { marks, .. } | Self::Link { marks, .. } => marks,
        }
    }

    #[must_use]
    pub fn is_link(&self) -> bool {
        matches!(self, Self::Link { .. })
    }

    fn push_mark(&mut self, mark: Mark) {
        match self {
            Self::Text { marks, .. } | Self::Link { marks, .. } => marks.push(mark),
        }
    }
}

/// Tag pairs the resolver recurses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Wrapper {
    Strong,
    Bold,
    Emphasis,
    Italic,
    Anchor,
}

impl Wrapper {
    const DECORATORS: [(Wrapper, Mark); 4] = [
        (Self::Strong, Mark::Strong),
        (Self::Bold, Mark::Strong),
        (Self::Emphasis, Mark::Em),
        (Self::Italic, Mark::Em),
    ];

    fn opener(self) -> &'static str {
        match self {
            Self::Strong => "<strong>",
            Self::Bold => "<b>",
            Self::Emphasis => "<em>",
            Self::Italic => "<i>",
            Self::Anchor => "<a",
        }
    }

    fn closer(self) -> &'static Regex {
        match self {
            Self::Strong => &STRONG_CLOSE_RE,
            Self::Bold => &B_CLOSE_RE,
            Self::Emphasis => &EM_CLOSE_RE,
            Self::Italic => &I_CLOSE_RE,
            Self::Anchor => &A_CLOSE_RE,
        }
    }

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

/// Resolve inline HTML into spans in reading order.
///
/// # Examples
///
/// ```
/// # use wp_portable_text::portable_text::{parse_inline, InlineSpan, Mark};
/// let spans = parse_inline("<strong><em>x</em></strong>");
/// assert_eq!(spans.len(), 1);
/// assert_eq!(spans[0].as_text(), "x");
/// assert!(spans[0].marks().contains(&Mark::Strong));
/// assert!(spans[0].marks().contains(&Mark::Em));
/// ```
#[must_use]
pub fn parse_inline(html: &str) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    InlineScanner::new(html).run(&mut spans);
    spans
}

struct InlineScanner<'a> {
    html: &'a str,
    pos: usize,
    /// Wrappers whose closing tag is known to be absent from `pos` onwards
    missing_closers: u8,
    last_gt: Option<usize>,
}

impl<'a> InlineScanner<'a> {
    fn new(html: &'a str) -> Self {
        Self {
            html,
            pos: 0,
            missing_closers: 0,
            last_gt: html.rfind('>'),
        }
    }

    fn run(&mut self, spans: &mut Vec<InlineSpan>) {
        let html = self.html;
        while self.pos < html.len() {
            let rest = &html[self.pos..];
            match rest.find('<') {
                None => {
                    push_text(spans, rest);
                    self.pos = html.len();
                }
                Some(0) => self.consume_tag(spans),
                Some(lt) => {
                    push_text(spans, &rest[..lt]);
                    self.pos += lt;
                }
            }
        }
    }

    /// Consume one construct starting at a `<`.
    fn consume_tag(&mut self, spans: &mut Vec<InlineSpan>) {
        let html = self.html;
        let rest = &html[self.pos..];

        if !self.tag_possible() {
            // No `>` left: nothing from here on can be a tag.
            self.pos += 1;
            return;
        }

        if let Some(m) = BR_RE.find(rest) {
            spans.push(InlineSpan::text("\n"));
            self.pos += m.end();
            return;
        }

        for (wrapper, mark) in Wrapper::DECORATORS {
            if let Some((inner, consumed)) = self.wrapped(rest, wrapper, wrapper.opener().len()) {
                for mut span in parse_inline(inner) {
                    span.push_mark(mark);
                    spans.push(span);
                }
                self.pos += consumed;
                return;
            }
        }

        if let Some(consumed) = self.link(rest, spans) {
            self.pos += consumed;
            return;
        }

        if let Some(m) = ANY_TAG_RE.find(rest) {
            tracing::trace!(tag = m.as_str(), "eliding unsupported inline tag");
            self.pos += m.end();
            return;
        }

        // A `<` that starts nothing recognizable is dropped.
        self.pos += 1;
    }

    fn tag_possible(&self) -> bool {
        self.last_gt.is_some_and(|gt| gt > self.pos)
    }

    /// Match `opener ... closer` at the start of `rest`, where the opener is
    /// `opener_len` bytes long and the closer is the first one after it.
    /// Returns the inner markup and the total bytes consumed.
    fn wrapped(&mut self, rest: &'a str, wrapper: Wrapper, opener_len: usize) -> Option<(&'a str, usize)> {
        if wrapper != Wrapper::Anchor && !starts_with_ignore_case(rest, wrapper.opener()) {
            return None;
        }
        if self.missing_closers & wrapper.bit() != 0 {
            return None;
        }
        let body = &rest[opener_len..];
        match wrapper.closer().find(body) {
            Some(close) => Some((&body[..close.start()], opener_len + close.end())),
            None => {
                self.missing_closers |= wrapper.bit();
                None
            }
        }
    }

    fn link(&mut self, rest: &'a str, spans: &mut Vec<InlineSpan>) -> Option<usize> {
        if !starts_with_ignore_case(rest, Wrapper::Anchor.opener()) {
            return None;
        }
        let open = ANCHOR_OPEN_RE.captures(rest)?;
        let open_tag = open.get(0)?.as_str();
        let href = decode_entities(open.get(1)?.as_str()).into_owned();
        let (inner, consumed) = self.wrapped(rest, Wrapper::Anchor, open_tag.len())?;

        let new_tab = open_tag.contains(r#"target="_blank""#) || open_tag.contains("target='_blank'");

        let mut inner_spans = parse_inline(inner);
        let span = match inner_spans.pop() {
            Some(InlineSpan::Text { text, marks }) if inner_spans.is_empty() => InlineSpan::Link {
                text,
                href,
                new_tab,
                marks,
            },
            // Formatting inside multi-span links is flattened to plain text.
            _ => InlineSpan::Link {
                text: strip_html(inner),
                href,
                new_tab,
                marks: Vec::new(),
            },
        };
        spans.push(span);
        Some(consumed)
    }
}

fn push_text(spans: &mut Vec<InlineSpan>, raw: &str) {
    let text = decode_entities(raw);
    if !text.is_empty() {
        spans.push(InlineSpan::text(text.into_owned()));
    }
}

fn starts_with_ignore_case(haystack: &str, prefix: &str) -> bool {
    haystack
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
