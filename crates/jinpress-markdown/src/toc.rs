//! Heading anchors and table-of-contents entries.

use serde::Serialize;

/// A table-of-contents entry, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TocEntry {
    /// Heading level (1-6).
    pub level: u8,
    /// Plain heading text.
    pub text: String,
    /// Anchor slug used as the heading's `id`.
    pub anchor: String,
}

/// Derives an anchor slug from heading text.
///
/// Lowercases, turns whitespace runs into single hyphens, drops
/// characters that are not alphanumeric, underscore or hyphen, and
/// trims leading/trailing hyphens. Duplicate headings produce
/// duplicate slugs; no counter suffix is added.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;
    for c in text.chars().flat_map(char::to_lowercase) {
        if c.is_whitespace() || c == '-' {
            pending_hyphen = true;
        } else if c.is_alphanumeric() || c == '_' {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c);
        }
        // Everything else is dropped without producing a hyphen.
    }
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
    }

    #[test]
    fn test_slugify_collapses_whitespace_and_hyphens() {
        assert_eq!(slugify("a - b"), "a-b");
        assert_eq!(slugify("a    b"), "a-b");
    }

    #[test]
    fn test_slugify_drops_punctuation() {
        assert_eq!(slugify("What's New?"), "whats-new");
        assert_eq!(slugify("foo::bar"), "foobar");
    }

    #[test]
    fn test_slugify_keeps_underscores() {
        assert_eq!(slugify("my_function name"), "my_function-name");
    }

    #[test]
    fn test_slugify_trims_edges() {
        assert_eq!(slugify("  spaces  "), "spaces");
        assert_eq!(slugify("!leading punctuation"), "leading-punctuation");
    }

    #[test]
    fn test_slugify_unicode() {
        assert_eq!(slugify("Héllo Wörld"), "héllo-wörld");
    }

    #[test]
    fn test_slugify_empty_when_nothing_survives() {
        assert_eq!(slugify("!!!"), "");
    }
}
