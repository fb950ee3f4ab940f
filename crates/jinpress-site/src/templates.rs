//! Template rendering with minijinja.
//!
//! Templates are resolved through a loader that checks the project's
//! `templates/` directory first and falls back to the embedded theme,
//! so users can override any theme template by shadowing its name.

use std::path::PathBuf;

use minijinja::{Environment, ErrorKind, Value};

use crate::context::PageRenderContext;
use crate::theme;

/// Template rendering errors.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    #[error("Template error: {0}")]
    Render(#[from] minijinja::Error),
}

/// Template engine with user-override support and site filters.
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Creates an engine.
    ///
    /// `user_templates_dir` is checked before the embedded theme; it
    /// does not need to exist. `base_path` must be the normalized site
    /// base and is baked into the `url_for` and `asset_url` filters.
    pub fn new(user_templates_dir: Option<PathBuf>, base_path: &str) -> Self {
        let mut env = Environment::new();

        env.set_loader(move |name| {
            if let Some(dir) = &user_templates_dir {
                let path = dir.join(name);
                if path.is_file() {
                    return std::fs::read_to_string(&path).map(Some).map_err(|err| {
                        minijinja::Error::new(
                            ErrorKind::InvalidOperation,
                            format!("failed to read template {}", path.display()),
                        )
                        .with_source(err)
                    });
                }
            }
            Ok(theme::template_source(name).map(str::to_owned))
        });

        let base = base_path.to_owned();
        env.add_filter("url_for", move |path: String, override_base: Option<String>| {
            apply_base(override_base.as_deref().unwrap_or(&base), &path)
        });
        let base = base_path.to_owned();
        env.add_filter("asset_url", move |path: String| {
            let trimmed = path.trim_start_matches('/');
            let asset_path = if trimmed.starts_with("assets/") {
                trimmed.to_owned()
            } else {
                format!("assets/{trimmed}")
            };
            apply_base(&base, &asset_path)
        });
        env.add_filter("format_date", format_date);

        Self { env }
    }

    /// Renders a named template with the given page context.
    pub fn render(&self, name: &str, context: &PageRenderContext) -> Result<String, TemplateError> {
        let template = self.env.get_template(name)?;
        Ok(template.render(Value::from_serialize(context))?)
    }
}

/// Prefixes a site-relative path with the base path exactly once.
/// External URLs pass through unchanged.
fn apply_base(base: &str, path: &str) -> String {
    if path.starts_with("http://")
        || path.starts_with("https://")
        || path.starts_with("//")
        || path.starts_with('#')
        || path.starts_with("mailto:")
    {
        return path.to_owned();
    }
    let prefix = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        if prefix.is_empty() {
            "/".to_owned()
        } else {
            format!("{prefix}/")
        }
    } else {
        format!("{prefix}/{path}")
    }
}

/// Formats a unix timestamp; an invalid timestamp or format string
/// yields an empty string rather than a render failure.
fn format_date(timestamp: i64, format: Option<String>) -> String {
    use chrono::format::{Item, StrftimeItems};

    let Some(datetime) = chrono::DateTime::from_timestamp(timestamp, 0) else {
        return String::new();
    };
    let format = format.unwrap_or_else(|| "%Y-%m-%d".to_owned());
    let items: Vec<Item<'_>> = StrftimeItems::new(&format).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return String::new();
    }
    datetime.format_with_items(items.into_iter()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{PageContext, SiteContext};
    use pretty_assertions::assert_eq;

    fn minimal_context() -> PageRenderContext {
        PageRenderContext {
            site: SiteContext {
                title: "Test Site".to_owned(),
                description: "A test".to_owned(),
                lang: "en".to_owned(),
                base: "/".to_owned(),
            },
            page: PageContext {
                title: "Hello".to_owned(),
                description: String::new(),
                url: "/hello/".to_owned(),
                source_path: "hello.md".to_owned(),
                last_modified: 1_700_000_000,
                frontmatter: serde_yaml::Mapping::new(),
            },
            content: "<p>Hi <strong>there</strong></p>".to_owned(),
            toc: Vec::new(),
            nav: Vec::new(),
            sidebar: Vec::new(),
            footer: jinpress_config::Footer::default(),
            edit_link: None,
            last_updated: true,
            prev: None,
            next: None,
        }
    }

    #[test]
    fn test_apply_base_root() {
        assert_eq!(apply_base("/", "style.css"), "/style.css");
        assert_eq!(apply_base("/", "/guide/"), "/guide/");
        assert_eq!(apply_base("/", ""), "/");
    }

    #[test]
    fn test_apply_base_prefixed_exactly_once() {
        assert_eq!(apply_base("/my-repo/", "/guide/"), "/my-repo/guide/");
        assert_eq!(apply_base("/my-repo/", "guide/"), "/my-repo/guide/");
        assert_eq!(apply_base("/my-repo/", ""), "/my-repo/");
    }

    #[test]
    fn test_apply_base_external_untouched() {
        assert_eq!(
            apply_base("/my-repo/", "https://example.com/x"),
            "https://example.com/x"
        );
        assert_eq!(apply_base("/my-repo/", "#anchor"), "#anchor");
    }

    #[test]
    fn test_format_date_default() {
        assert_eq!(format_date(0, None), "1970-01-01");
    }

    #[test]
    fn test_format_date_custom_format() {
        assert_eq!(format_date(0, Some("%Y".to_owned())), "1970");
    }

    #[test]
    fn test_format_date_invalid_format_is_empty() {
        assert_eq!(format_date(0, Some("%Q".to_owned())), "");
    }

    #[test]
    fn test_render_default_theme() {
        let engine = TemplateEngine::new(None, "/");
        let html = engine.render("page.html", &minimal_context()).unwrap();
        assert!(html.contains("<strong>there</strong>"), "body not inlined: {html}");
        assert!(html.contains("Test Site"));
        assert!(html.contains("lang=\"en\""));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let engine = TemplateEngine::new(None, "/");
        assert!(engine.render("nope.html", &minimal_context()).is_err());
    }

    #[test]
    fn test_user_template_overrides_theme() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("page.html"), "override: {{ page.title }}").unwrap();
        let engine = TemplateEngine::new(Some(dir.path().to_path_buf()), "/");
        let html = engine.render("page.html", &minimal_context()).unwrap();
        assert_eq!(html, "override: Hello");
    }

    #[test]
    fn test_asset_url_respects_base() {
        let engine = TemplateEngine::new(None, "/my-repo/");
        let html = engine.render("page.html", &minimal_context()).unwrap();
        assert!(html.contains("/my-repo/assets/style.css"), "{html}");
    }
}
