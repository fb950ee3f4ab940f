//! Custom container expansion.
//!
//! Expands `::: type [title]` / `:::` blocks into HTML wrappers before
//! markdown parsing, so the container body is still parsed as
//! markdown:
//!
//! ```text
//! ::: tip Pro tip
//! Use **bold** text.
//! :::
//! ```
//!
//! Supported types: `tip`, `warning`, `danger`, `info` (rendered as
//! `<div class="custom-block ...">`) and `details` (rendered as a
//! collapsible `<details>` element). Markers inside fenced code blocks
//! are left untouched, as is an opening marker with no closing `:::`.

use crate::escape_html;

/// Known container types and their default titles.
const CONTAINER_TYPES: &[(&str, &str)] = &[
    ("tip", "TIP"),
    ("warning", "WARNING"),
    ("danger", "DANGER"),
    ("info", "INFO"),
    ("details", "Details"),
];

struct Marker<'a> {
    kind: &'a str,
    title: String,
}

/// Parses `::: type [title]` after leading whitespace. Returns `None`
/// for non-markers and unknown types.
fn parse_open_marker(line: &str) -> Option<Marker<'_>> {
    let rest = line.trim_start().strip_prefix(":::")?;
    let params = rest.trim();
    if params.is_empty() {
        return None;
    }
    let (kind_word, title) = match params.split_once(char::is_whitespace) {
        Some((kind, title)) => (kind, title.trim()),
        None => (params, ""),
    };
    let (kind, default_title) = CONTAINER_TYPES
        .iter()
        .find(|(kind, _)| kind.eq_ignore_ascii_case(kind_word))
        .copied()?;
    let title = if title.is_empty() { default_title } else { title };
    Some(Marker {
        kind,
        title: title.to_owned(),
    })
}

fn is_close_marker(line: &str) -> bool {
    line.trim() == ":::"
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.starts_with("```") || trimmed.starts_with("~~~")
}

/// Whether a bare `:::` closing marker exists at or after `start`,
/// ignoring lines inside code fences.
fn has_close_marker(lines: &[&str], start: usize) -> bool {
    let mut in_fence = false;
    for line in &lines[start..] {
        if is_fence(line) {
            in_fence = !in_fence;
            continue;
        }
        if !in_fence && is_close_marker(line) {
            return true;
        }
    }
    false
}

/// Expands container markers into raw HTML blocks.
pub(crate) fn preprocess(body: &str) -> String {
    let lines: Vec<&str> = body.lines().collect();
    let mut out = String::with_capacity(body.len() + 64);
    let mut in_fence = false;
    let mut open: Option<&str> = None;

    for (i, line) in lines.iter().enumerate() {
        if is_fence(line) {
            in_fence = !in_fence;
            out.push_str(line);
            out.push('\n');
            continue;
        }
        if in_fence {
            out.push_str(line);
            out.push('\n');
            continue;
        }

        if let Some(kind) = open {
            if is_close_marker(line) {
                out.push('\n');
                if kind == "details" {
                    out.push_str("</details>\n");
                } else {
                    out.push_str("</div>\n");
                }
                open = None;
                continue;
            }
        } else if let Some(marker) = parse_open_marker(line) {
            // An unterminated container is not a container at all.
            if has_close_marker(&lines, i + 1) {
                let title = escape_html(&marker.title);
                out.push('\n');
                if marker.kind == "details" {
                    out.push_str(&format!(
                        "<details class=\"custom-block details\">\n<summary>{title}</summary>\n\n"
                    ));
                } else {
                    out.push_str(&format!(
                        "<div class=\"custom-block {}\">\n<p class=\"custom-block-title\">{title}</p>\n\n",
                        marker.kind
                    ));
                }
                open = Some(marker.kind);
                continue;
            }
        }

        out.push_str(line);
        out.push('\n');
    }

    out
}
