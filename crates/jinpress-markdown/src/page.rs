//! Page processing: source file to [`ProcessedPage`].

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde_yaml::Mapping;

use crate::renderer::render_html;
use crate::toc::TocEntry;
use crate::url::url_path_for;
use crate::{ProcessError, containers, frontmatter};

/// A fully processed markdown page, ready for template rendering and
/// search indexing.
#[derive(Debug, Clone)]
pub struct ProcessedPage {
    /// Source path relative to the docs directory.
    pub relative_path: PathBuf,
    /// Site URL path (clean URL with trailing slash, includes base).
    pub url_path: String,
    /// Page title: front matter `title`, first H1, or filename.
    pub title: String,
    /// Page description from front matter (may be empty).
    pub description: String,
    /// Rendered HTML body.
    pub content: String,
    /// Markdown source body with front matter stripped.
    pub raw_content: String,
    /// Raw front matter mapping.
    pub frontmatter: Mapping,
    /// Table of contents entries in document order.
    pub toc: Vec<TocEntry>,
    /// Source file modification time (unix seconds).
    pub last_modified: i64,
}

/// Markdown processor configured with the site base path.
#[derive(Debug, Clone)]
pub struct MarkdownProcessor {
    base: String,
}

impl MarkdownProcessor {
    /// Creates a processor. `base` must be normalized (`/` or `/.../`).
    pub fn new(base: impl Into<String>) -> Self {
        Self { base: base.into() }
    }

    /// Processes a markdown file under `docs_dir`.
    pub fn process_file(
        &self,
        path: &Path,
        docs_dir: &Path,
    ) -> Result<ProcessedPage, ProcessError> {
        let relative = path
            .strip_prefix(docs_dir)
            .map_err(|_| ProcessError::OutsideDocsDir {
                path: path.to_path_buf(),
            })?
            .to_path_buf();
        let content = std::fs::read_to_string(path).map_err(|source| ProcessError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let last_modified = file_mtime(path);
        self.process_content(&content, relative, last_modified)
            .map_err(|source| ProcessError::FrontMatter {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Processes markdown content for the given docs-relative path.
    pub fn process_content(
        &self,
        content: &str,
        relative_path: PathBuf,
        last_modified: i64,
    ) -> Result<ProcessedPage, serde_yaml::Error> {
        let (frontmatter, body) = frontmatter::extract(content)?;
        let expanded = containers::preprocess(body);
        let rendered = render_html(&expanded);

        let title = frontmatter_str(&frontmatter, "title")
            .map(str::to_owned)
            .or(rendered.first_heading)
            .unwrap_or_else(|| title_from_path(&relative_path));
        let description = frontmatter_str(&frontmatter, "description")
            .unwrap_or_default()
            .to_owned();
        let url_path = url_path_for(&relative_path, &self.base);

        Ok(ProcessedPage {
            relative_path,
            url_path,
            title,
            description,
            content: rendered.html,
            raw_content: body.to_owned(),
            frontmatter,
            toc: rendered.toc,
            last_modified,
        })
    }
}

fn frontmatter_str<'a>(mapping: &'a Mapping, key: &str) -> Option<&'a str> {
    mapping.get(key).and_then(serde_yaml::Value::as_str)
}

fn file_mtime(path: &Path) -> i64 {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .and_then(|duration| i64::try_from(duration.as_secs()).ok())
        .unwrap_or(0)
}

/// Fallback title from the file stem: `getting-started.md` becomes
/// `Getting Started`.
fn title_from_path(relative: &Path) -> String {
    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    stem.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn processor() -> MarkdownProcessor {
        MarkdownProcessor::new("/")
    }

    #[test]
    fn test_title_from_front_matter_wins() {
        let page = processor()
            .process_content(
                "---\ntitle: From Front Matter\n---\n# From Heading\n",
                PathBuf::from("from-file.md"),
                0,
            )
            .unwrap();
        assert_eq!(page.title, "From Front Matter");
        assert_eq!(page.raw_content, "# From Heading\n");
    }

    #[test]
    fn test_title_falls_back_to_first_heading() {
        let page = processor()
            .process_content("# From Heading\n", PathBuf::from("from-file.md"), 0)
            .unwrap();
        assert_eq!(page.title, "From Heading");
    }

    #[test]
    fn test_title_falls_back_to_filename() {
        let page = processor()
            .process_content("plain text\n", PathBuf::from("getting_started.md"), 0)
            .unwrap();
        assert_eq!(page.title, "Getting Started");
    }

    #[test]
    fn test_url_path_includes_base() {
        let processor = MarkdownProcessor::new("/docs/");
        let page = processor
            .process_content("# Hi\n", PathBuf::from("guide/intro.md"), 0)
            .unwrap();
        assert_eq!(page.url_path, "/docs/guide/intro/");
    }

    #[test]
    fn test_description_from_front_matter() {
        let page = processor()
            .process_content(
                "---\ndescription: A page\n---\nbody\n",
                PathBuf::from("a.md"),
                0,
            )
            .unwrap();
        assert_eq!(page.description, "A page");
    }

    #[test]
    fn test_containers_rendered() {
        let page = processor()
            .process_content("::: tip\nUse **bold**.\n:::\n", PathBuf::from("a.md"), 0)
            .unwrap();
        assert!(page.content.contains("custom-block tip"));
        assert!(page.content.contains("<strong>bold</strong>"));
    }

    #[test]
    fn test_process_file_reads_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let docs = dir.path().join("docs");
        std::fs::create_dir_all(docs.join("guide")).unwrap();
        let path = docs.join("guide/intro.md");
        std::fs::write(&path, "# Intro\n").unwrap();

        let page = processor().process_file(&path, &docs).unwrap();
        assert_eq!(page.relative_path, PathBuf::from("guide/intro.md"));
        assert_eq!(page.url_path, "/guide/intro/");
        assert!(page.last_modified > 0);
    }

    #[test]
    fn test_process_file_outside_docs_dir_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stray.md");
        std::fs::write(&path, "hi").unwrap();
        let err = processor()
            .process_file(&path, &dir.path().join("docs"))
            .unwrap_err();
        assert!(matches!(err, ProcessError::OutsideDocsDir { .. }));
    }

    #[test]
    fn test_process_file_bad_front_matter_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.md");
        std::fs::write(&path, "---\ntitle: [unclosed\n---\nbody").unwrap();
        let err = processor().process_file(&path, dir.path()).unwrap_err();
        assert!(matches!(err, ProcessError::FrontMatter { .. }));
    }
}
