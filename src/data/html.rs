//! Minimal, tolerant HTML table extraction.
//!
//! The poll source publishes a single `<table>` of results. We only need
//! that one table, so instead of a full DOM we scan for tag blocks
//! case-insensitively, strip markup inside cells, and decode the handful of
//! entities that actually occur in the data. Headers come from the first
//! row's `<th>` (or `<td>`) cells.

use crate::error::PollError;

/// A fetched table before any typing: header names plus string cells.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Extract the first `<table>` element from an HTML page.
pub fn extract_first_table(html: &str) -> Result<RawTable, PollError> {
    let table = find_block(html, "table")
        .ok_or_else(|| PollError::Fetch("no <table> element found in page".to_string()))?;

    let mut headers = Vec::new();
    let mut rows = Vec::new();

    let mut rest = table;
    while let Some((row_html, after)) = take_block(rest, "tr") {
        rest = after;
        let cells = extract_cells(row_html);
        if cells.is_empty() {
            continue;
        }
        if headers.is_empty() {
            headers = cells;
        } else {
            rows.push(cells);
        }
    }

    if headers.is_empty() {
        return Err(PollError::Fetch(
            "table has no header row".to_string(),
        ));
    }

    Ok(RawTable { headers, rows })
}

/// Cell texts of one `<tr>` block, `<th>` and `<td>` alike, in order.
fn extract_cells(row_html: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut rest = row_html;
    loop {
        let th = find_open(rest, "th");
        let td = find_open(rest, "td");
        let tag = match (th, td) {
            (Some(a), Some(b)) => {
                if a < b {
                    "th"
                } else {
                    "td"
                }
            }
            (Some(_), None) => "th",
            (None, Some(_)) => "td",
            (None, None) => break,
        };
        match take_block(rest, tag) {
            Some((cell, after)) => {
                cells.push(clean_cell(cell));
                rest = after;
            }
            None => break,
        }
    }
    cells
}

/// Inner HTML of the first `<tag ...>...</tag>` block.
fn find_block<'a>(html: &'a str, tag: &str) -> Option<&'a str> {
    take_block(html, tag).map(|(inner, _)| inner)
}

/// Inner HTML of the first `<tag ...>` block plus the remainder after it.
///
/// Unclosed tags (common in hand-written table markup) are treated as
/// running to the next opening of the same tag, or to the end of input.
fn take_block<'a>(html: &'a str, tag: &str) -> Option<(&'a str, &'a str)> {
    let open_at = find_open(html, tag)?;
    let after_open = &html[open_at..];
    let content_start = after_open.find('>')? + 1;
    let content = &after_open[content_start..];

    let close = format!("</{tag}");
    let close_at = find_ci(content, &close);
    let next_open = find_open(content, tag);

    match (close_at, next_open) {
        (Some(c), Some(n)) if n < c => Some((&content[..n], &content[n..])),
        (Some(c), _) => {
            let after_close = content[c..].find('>').map(|i| c + i + 1).unwrap_or(content.len());
            Some((&content[..c], &content[after_close..]))
        }
        (None, Some(n)) => Some((&content[..n], &content[n..])),
        (None, None) => Some((content, "")),
    }
}

/// Byte offset of the next `<tag>` or `<tag ...>` opening, case-insensitive.
fn find_open(html: &str, tag: &str) -> Option<usize> {
    let lower = html.to_ascii_lowercase();
    let needle = format!("<{tag}");
    let mut from = 0;
    while let Some(rel) = lower[from..].find(&needle) {
        let at = from + rel;
        let after = lower.as_bytes().get(at + needle.len()).copied();
        // Reject prefixes like `<thead>` when searching for `<th>`.
        match after {
            Some(b'>') | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'/') => {
                return Some(at);
            }
            _ => from = at + needle.len(),
        }
    }
    None
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

/// Strip nested tags, decode entities, collapse whitespace.
fn clean_cell(cell: &str) -> String {
    let mut text = String::with_capacity(cell.len());
    let mut in_tag = false;
    for c in cell.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => text.push(c),
            _ => {}
        }
    }
    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
