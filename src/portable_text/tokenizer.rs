//! Top-level element splitting.
//!
//! A WordPress post body is a flat run of block elements (`<p>`, `<h2>`,
//! `<ul>`, `<figure>`, ...) separated by whitespace. [`split_top_level`]
//! walks the fragment once, tracking tag depth so that nested children stay
//! inside their parent, and yields each top-level element as a trimmed slice
//! of the input.
//!
//! The scanner never fails: unbalanced closing tags floor the depth at zero
//! and anything that is not a well-formed tag is treated as text.

use regex::Regex;
use std::sync::LazyLock;

/// `<img>`, `<hr>` and `<br>` with or without a self-closing slash
static VOID_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^<(?:img|hr|br)\b[^>]*>").expect("VOID_TAG_RE: hardcoded regex is valid")
});

static CLOSING_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^</[a-zA-Z][a-zA-Z0-9]*[^>]*>").expect("CLOSING_TAG_RE: hardcoded regex is valid")
});

static OPENING_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<[a-zA-Z][a-zA-Z0-9]*[^>]*>").expect("OPENING_TAG_RE: hardcoded regex is valid")
});

/// Split a cleaned fragment into top-level elements.
///
/// The returned iterator is lazy and borrows `html`; call again (or clone
/// the iterator) to restart.
///
/// # Examples
///
/// ```
/// # use wp_portable_text::portable_text::split_top_level;
/// let parts: Vec<_> = split_top_level("<p>a <b>b</b></p>\n<hr/>tail").collect();
/// assert_eq!(parts, vec!["<p>a <b>b</b></p>", "<hr/>", "tail"]);
/// ```
#[must_use]
pub fn split_top_level(html: &str) -> TopLevelElements<'_> {
    TopLevelElements {
        html,
        pos: 0,
        start: 0,
        depth: 0,
        last_gt: html.rfind('>'),
    }
}

/// Iterator over top-level elements. See [`split_top_level`].
#[derive(Debug, Clone)]
pub struct TopLevelElements<'a> {
    html: &'a str,
    /// Scan position
    pos: usize,
    /// Start of the pending buffer
    start: usize,
    depth: usize,
    last_gt: Option<usize>,
}

impl<'a> TopLevelElements<'a> {
    /// Emit the buffer `start..end` if it holds anything but whitespace.
    fn flush(&mut self, end: usize) -> Option<&'a str> {
        let html = self.html;
        let element = html[self.start..end].trim();
        self.start = end;
        (!element.is_empty()).then_some(element)
    }

    fn tag_possible(&self) -> bool {
        self.last_gt.is_some_and(|gt| gt > self.pos)
    }
}

impl<'a> Iterator for TopLevelElements<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let html = self.html;

        while self.pos < html.len() {
            let rest = &html[self.pos..];

            if !rest.starts_with('<') {
                self.pos += rest.find('<').unwrap_or(rest.len());
                continue;
            }
            if !self.tag_possible() {
                self.pos += 1;
                continue;
            }

            if let Some(tag) = VOID_TAG_RE.find(rest) {
                if self.depth > 0 {
                    self.pos += tag.end();
                    continue;
                }
                // Pending text goes out first; the tag is revisited next call.
                if let Some(pending) = self.flush(self.pos) {
                    return Some(pending);
                }
                self.pos += tag.end();
                if let Some(element) = self.flush(self.pos) {
                    return Some(element);
                }
                continue;
            }

            if let Some(tag) = CLOSING_TAG_RE.find(rest) {
                self.depth = self.depth.saturating_sub(1);
                self.pos += tag.end();
                if self.depth == 0
                    && let Some(element) = self.flush(self.pos)
                {
                    return Some(element);
                }
                continue;
            }

            if let Some(tag) = OPENING_TAG_RE.find(rest) {
                if self.depth == 0
                    && let Some(pending) = self.flush(self.pos)
                {
                    return Some(pending);
                }
                self.pos += tag.end();
                if tag.as_str().ends_with("/>") {
                    if self.depth == 0
                        && let Some(element) = self.flush(self.pos)
                    {
                        return Some(element);
                    }
                } else {
                    self.depth += 1;
                }
                continue;
            }

            // Not a tag: keep the `<` as text.
            self.pos += 1;
        }

        if self.start < html.len() {
            return self.flush(html.len());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(html: &str) -> Vec<&str> {
        split_top_level(html).collect()
    }

    #[test]
    fn test_siblings_and_nesting() {
        let html = "<p>One</p>\n\n<ul><li>A</li><li>B <em>b</em></li></ul>\n<h2>Title</h2>";
        assert_eq!(
            split(html),
            vec!["<p>One</p>", "<ul><li>A</li><li>B <em>b</em></li></ul>", "<h2>Title</h2>"]
        );
    }

    #[test]
    fn test_void_tags_at_top_level_split_text() {
        assert_eq!(
            split(r#"intro<img src="a.jpg">outro<br>"#),
            vec!["intro", r#"<img src="a.jpg">"#, "outro", "<br>"]
        );
    }

    #[test]
    fn test_void_tags_inside_elements_stay_put() {
        assert_eq!(
            split(r#"<p>a<br/>b<img src="x.png" /></p>"#),
            vec![r#"<p>a<br/>b<img src="x.png" /></p>"#]
        );
    }

    #[test]
    fn test_self_terminating_opening_tag() {
        assert_eq!(
            split("text<source src=\"v.mp4\"/><p>x</p>"),
            vec!["text", "<source src=\"v.mp4\"/>", "<p>x</p>"]
        );
    }

    #[test]
    fn test_stray_closing_tag_floors_depth() {
        assert_eq!(split("</div>after<p>x</p>"), vec!["</div>", "after", "<p>x</p>"]);
    }

    #[test]
    fn test_unclosed_element_flushed_at_end() {
        assert_eq!(split("<div><p>open"), vec!["<div><p>open"]);
    }

    #[test]
    fn test_text_with_stray_angle_bracket() {
        assert_eq!(split("a < b"), vec!["a < b"]);
        assert_eq!(split("<p>1 < 2</p>"), vec!["<p>1 < 2</p>"]);
    }

    #[test]
    fn test_restartable_and_empty() {
        let iter = split_top_level("<p>a</p><p>b</p>");
        assert_eq!(iter.clone().count(), 2);
        assert_eq!(iter.collect::<Vec<_>>(), vec!["<p>a</p>", "<p>b</p>"]);
        assert!(split("   ").is_empty());
        assert!(split("").is_empty());
    }
}
