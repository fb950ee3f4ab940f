//! Markdown processing pipeline for JinPress.
//!
//! Turns a markdown source file into a [`ProcessedPage`]: YAML front
//! matter is split off, custom containers are expanded, the body is
//! rendered to HTML with heading anchors and clean-URL link rewriting,
//! and a table of contents is collected along the way.

mod containers;
mod frontmatter;
mod page;
mod renderer;
mod toc;
mod url;

pub use page::{MarkdownProcessor, ProcessedPage};
pub use renderer::{RenderResult, render_html};
pub use toc::{TocEntry, slugify};
pub use url::{strip_base, url_path_for};

use std::path::PathBuf;

/// Markdown processing errors.
#[derive(Debug, thiserror::Error)]
pub enum ProcessError {
    /// Failed to read a source file.
    #[error("Failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Front matter is present but not valid YAML (or not a mapping).
    #[error("Invalid front matter in {}: {source}", .path.display())]
    FrontMatter {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    /// Source file is not under the docs directory.
    #[error("{} is outside the docs directory", .path.display())]
    OutsideDocsDir { path: PathBuf },
}

/// Escapes `&`, `<`, `>` and `"` for safe HTML interpolation.
pub(crate) fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}
