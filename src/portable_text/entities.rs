//! HTML entity decoding and tag stripping.
//!
//! WordPress exports mix a handful of named entities with numeric references
//! for typographic punctuation (`&#8217;`, `&#8220;`, ...). Decoding is a
//! single left-to-right pass: a replacement is never re-scanned, so `&amp;lt;`
//! decodes to `&lt;` and not to `<`.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::sync::LazyLock;

/// Any entity-shaped reference: `&name;`, `&#123;` or `&#x7B;`
static ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);")
        .expect("ENTITY_RE: hardcoded regex is valid")
});

/// Any tag-shaped construct, including comments and doctype declarations
static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("TAG_RE: hardcoded regex is valid"));

/// Decode HTML entities in `text`.
///
/// The fixed export table is consulted first (note that `&nbsp;` and `&#160;`
/// become a plain space), then any decimal reference is mapped to its code
/// point. Remaining named and hexadecimal references go through
/// `html_escape`. References that do not resolve are left untouched.
///
/// Returns `Cow::Borrowed` when nothing was decoded.
///
/// # Examples
///
/// ```
/// # use wp_portable_text::portable_text::decode_entities;
/// assert_eq!(decode_entities("Tom &amp; Jerry&#8217;s"), "Tom & Jerry\u{2019}s");
/// assert_eq!(decode_entities("&amp;lt;"), "&lt;");
/// ```
pub fn decode_entities(text: &str) -> Cow<'_, str> {
    if !text.contains('&') {
        return Cow::Borrowed(text);
    }

    ENTITY_RE.replace_all(text, |caps: &Captures<'_>| {
        let whole = &caps[0];
        let body = &caps[1];
        match decode_reference(body) {
            Some(c) => c.to_string(),
            // out-of-range decimal reference
            None if is_decimal_reference(body) => whole.to_string(),
            None => html_escape::decode_html_entities(whole).into_owned(),
        }
    })
}

/// Resolve one reference body (the part between `&` and `;`).
fn decode_reference(body: &str) -> Option<char> {
    let c = match body {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "nbsp" | "#160" => ' ',
        "#039" | "#39" => '\'',
        "#8216" => '\u{2018}',
        "#8217" => '\u{2019}',
        "#8220" => '\u{201C}',
        "#8221" => '\u{201D}',
        "#8211" => '\u{2013}',
        "#8212" => '\u{2014}',
        "#8230" => '\u{2026}',
        "#8243" => '\u{2033}',
        _ if is_decimal_reference(body) => {
            return body[1..].parse::<u32>().ok().and_then(char::from_u32);
        }
        _ => return None,
    };
    Some(c)
}

fn is_decimal_reference(body: &str) -> bool {
    body.strip_prefix('#')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Remove every tag-shaped construct from `html` without decoding entities.
pub fn strip_tags(html: &str) -> Cow<'_, str> {
    TAG_RE.replace_all(html, "")
}

/// Remove every tag and decode the remaining text.
pub fn strip_html(html: &str) -> String {
    let stripped = strip_tags(html);
    decode_entities(&stripped).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decodes_export_table() {
        let input = "&amp;&lt;&gt;&quot;&#8216;&#8217;&#8220;&#8221;&#8211;&#8212;&#8230;&nbsp;&#160;&#8243;&#039;";
        let expected = "&<>\"\u{2018}\u{2019}\u{201C}\u{201D}\u{2013}\u{2014}\u{2026}  \u{2033}'";
        assert_eq!(decode_entities(input), expected);
    }

    #[test]
    fn test_generic_numeric_reference() {
        assert_eq!(decode_entities("&#65;&#9731;"), "A\u{2603}");
    }

    #[test]
    fn test_single_pass_no_rescan() {
        assert_eq!(decode_entities("&amp;amp;"), "&amp;");
        assert_eq!(decode_entities("&amp;#8217;"), "&#8217;");
    }

    #[test]
    fn test_named_fallback_through_html_escape() {
        assert_eq!(decode_entities("&hellip;&mdash;"), "\u{2026}\u{2014}");
        assert_eq!(decode_entities("&#x2019;"), "\u{2019}");
    }

    #[test]
    fn test_unknown_and_invalid_references_untouched() {
        assert_eq!(decode_entities("&notanentity;"), "&notanentity;");
        assert_eq!(decode_entities("&#99999999999;"), "&#99999999999;");
        assert_eq!(decode_entities("AT&T & co"), "AT&T & co");
    }

    #[test]
    fn test_plain_text_is_borrowed() {
        assert!(matches!(decode_entities("plain text"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_html() {
        assert_eq!(
            strip_html("<p>Fish <em>&amp;</em> chips</p>"),
            "Fish & chips"
        );
        assert_eq!(strip_tags("a <br/> b"), "a  b");
    }
}
