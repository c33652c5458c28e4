//! Table flattening.
//!
//! Portable Text has no table block, so each body row becomes one paragraph
//! of `"Header: value"` pairs joined by `" | "`. Column structure beyond that
//! text is lost.

use regex::Regex;
use std::sync::LazyLock;

use super::blocks::{Block, BlockStyle, ContentBlock};
use super::entities::strip_html;
use super::inline::InlineSpan;
use super::keys::KeySource;

static ROW_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<tr(?:\s[^>]*)?>(.*?)</tr>").expect("ROW_RE: hardcoded regex is valid")
});

static CELL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<t[hd](?:\s[^>]*)?>(.*?)</t[hd]>").expect("CELL_RE: hardcoded regex is valid")
});

const CELL_SEPARATOR: &str = " | ";

/// Extract the plain text of every cell, row by row.
#[must_use]
pub fn table_rows(html: &str) -> Vec<Vec<String>> {
    ROW_RE
        .captures_iter(html)
        .map(|row| {
            let row_html = row.get(1).map_or("", |m| m.as_str());
            CELL_RE
                .captures_iter(row_html)
                .map(|cell| strip_html(cell.get(1).map_or("", |m| m.as_str())).trim().to_string())
                .collect()
        })
        .collect()
}

/// Render one body row against the header row.
#[must_use]
pub fn format_row(headers: &[String], cells: &[String]) -> String {
    cells
        .iter()
        .enumerate()
        .map(|(column, cell)| match headers.get(column) {
            Some(header) if !header.is_empty() => format!("{header}: {cell}"),
            _ => cell.clone(),
        })
        .collect::<Vec<_>>()
        .join(CELL_SEPARATOR)
}

/// Flatten a table element into one `normal` block per body row.
///
/// The first row is the header row. A table with a single row (or none) has
/// no body and produces nothing.
pub fn table_blocks<K>(html: &str, keys: &mut K) -> Vec<Block>
where
    K: KeySource + ?Sized,
{
    let rows = table_rows(html);
    let Some((headers, body)) = rows.split_first() else {
        return Vec::new();
    };
    if body.is_empty() {
        tracing::debug!("table has no body rows, skipping");
        return Vec::new();
    }

    tracing::debug!(rows = body.len(), columns = headers.len(), "flattening table");
    body.iter()
        .map(|cells| {
            let text = format_row(headers, cells);
            Block::from(ContentBlock::assemble(
                BlockStyle::Normal,
                vec![InlineSpan::text(text)],
                &mut *keys,
            ))
        })
        .collect()
}
