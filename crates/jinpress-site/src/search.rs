//! Client-side search index generation.
//!
//! Each built page contributes one document to a JSON array written
//! alongside the site output. The page HTML is reduced to plain text:
//! tags become spaces, script and style bodies are dropped, common
//! entities are decoded, and whitespace runs collapse to single
//! spaces. Serialization is compact and keeps non-ASCII characters
//! as-is.

use std::path::Path;

use jinpress_markdown::ProcessedPage;
use serde::Serialize;

/// One searchable document.
#[derive(Debug, Clone, Serialize)]
pub struct SearchDocument {
    pub url: String,
    pub title: String,
    /// Plain text extracted from the rendered HTML.
    pub content: String,
    /// Heading texts, weighted higher by the client.
    pub headings: Vec<String>,
    pub description: String,
}

/// Accumulates search documents for one build.
#[derive(Debug, Default)]
pub struct SearchIndexer {
    documents: Vec<SearchDocument>,
}

impl SearchIndexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a processed page. `fallback_description` is used when the
    /// page has no front matter description.
    pub fn add_page(&mut self, page: &ProcessedPage, fallback_description: &str) {
        let description = if page.description.is_empty() {
            fallback_description.to_owned()
        } else {
            page.description.clone()
        };
        self.documents.push(SearchDocument {
            url: page.url_path.clone(),
            title: page.title.clone(),
            content: extract_text(&page.content),
            headings: page.toc.iter().map(|entry| entry.text.clone()).collect(),
            description,
        });
    }

    /// Writes the index as a compact JSON array, creating parent
    /// directories as needed.
    pub fn write_index(&self, path: &Path) -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.documents).map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// Reduces HTML to searchable plain text.
fn extract_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(open) = rest.find('<') {
        text.push_str(&rest[..open]);
        let after = &rest[open..];
        let Some(close) = after.find('>') else {
            // Dangling '<' with no closing bracket; drop the remainder.
            rest = "";
            break;
        };
        let tag = after[1..close].trim();
        rest = &after[close + 1..];
        text.push(' ');

        if !tag.starts_with('/') {
            let name = tag
                .split(|c: char| c.is_whitespace() || c == '>')
                .next()
                .unwrap_or("")
                .to_ascii_lowercase();
            if name == "script" || name == "style" {
                rest = skip_past_close_tag(rest, &name);
            }
        }
    }
    text.push_str(rest);

    let decoded = decode_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Advances past `</name ...>`, or to the end of input when unclosed.
fn skip_past_close_tag<'a>(rest: &'a str, name: &str) -> &'a str {
    let needle = format!("</{name}");
    if let Some(pos) = rest.to_ascii_lowercase().find(&needle) {
        let tail = &rest[pos..];
        match tail.find('>') {
            Some(end) => &tail[end + 1..],
            None => "",
        }
    } else {
        ""
    }
}

fn decode_entities(text: &str) -> String {
    // `&amp;` last so decoded ampersands cannot form new entities.
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn page(url: &str, title: &str, content: &str) -> ProcessedPage {
        ProcessedPage {
            relative_path: PathBuf::from("a.md"),
            url_path: url.to_owned(),
            title: title.to_owned(),
            description: String::new(),
            content: content.to_owned(),
            raw_content: String::new(),
            frontmatter: serde_yaml::Mapping::new(),
            toc: Vec::new(),
            last_modified: 0,
        }
    }

    #[test]
    fn test_extract_text_strips_tags() {
        assert_eq!(
            extract_text("<p>Hello <strong>world</strong></p>"),
            "Hello world"
        );
    }

    #[test]
    fn test_extract_text_drops_script_and_style() {
        assert_eq!(
            extract_text("<p>before</p><script>var x = 1;</script><p>after</p>"),
            "before after"
        );
        assert_eq!(
            extract_text("<style>body { color: red }</style>text"),
            "text"
        );
    }

    #[test]
    fn test_extract_text_decodes_entities() {
        assert_eq!(extract_text("a &lt;b&gt; &amp; c"), "a <b> & c");
        // A double-encoded entity decodes one level only.
        assert_eq!(extract_text("&amp;lt;"), "&lt;");
    }

    #[test]
    fn test_extract_text_collapses_whitespace() {
        assert_eq!(extract_text("<p>a</p>\n\n  <p>b</p>"), "a b");
    }

    #[test]
    fn test_index_document_fields() {
        let mut indexer = SearchIndexer::new();
        let mut p = page("/guide/", "Guide", "<p>Content here</p>");
        p.toc.push(jinpress_markdown::TocEntry {
            level: 2,
            text: "Section".to_owned(),
            anchor: "section".to_owned(),
        });
        indexer.add_page(&p, "Site description");
        assert_eq!(indexer.len(), 1);
        assert_eq!(indexer.documents[0].url, "/guide/");
        assert_eq!(indexer.documents[0].headings, vec!["Section"]);
        assert_eq!(indexer.documents[0].description, "Site description");
    }

    #[test]
    fn test_index_contains_every_added_page() {
        let entries = [
            ("/", "Home"),
            ("/guide/", "Guide"),
            ("/guide/install/", "Installation"),
            ("/reference/cli/", "CLI Reference"),
        ];
        let mut indexer = SearchIndexer::new();
        for (url, title) in entries {
            indexer.add_page(&page(url, title, "<p>body</p>"), "");
        }
        assert_eq!(indexer.len(), entries.len());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("search-index.json");
        indexer.write_index(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        let documents: serde_json::Value = serde_json::from_str(&json).unwrap();
        let documents = documents.as_array().unwrap();
        assert_eq!(documents.len(), entries.len());
        for (url, title) in entries {
            assert!(
                documents
                    .iter()
                    .any(|doc| doc["url"] == url && doc["title"] == title),
                "missing document for {url}"
            );
        }
    }

    #[test]
    fn test_write_index_compact_and_non_ascii() {
        let dir = tempfile::tempdir().unwrap();
        let mut indexer = SearchIndexer::new();
        indexer.add_page(&page("/", "Héllo", "<p>日本語</p>"), "");
        let path = dir.path().join("search-index.json");
        indexer.write_index(&path).unwrap();
        let json = std::fs::read_to_string(&path).unwrap();
        assert!(json.contains("日本語"), "non-ASCII must not be escaped: {json}");
        assert!(!json.contains(": "), "output must be compact: {json}");
    }

    #[test]
    fn test_empty_index_is_valid_json() {
        let dir = tempfile::tempdir().unwrap();
        let indexer = SearchIndexer::new();
        let path = dir.path().join("search-index.json");
        indexer.write_index(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }
}
