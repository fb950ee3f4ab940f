//! Template render context.
//!
//! The context is serialized into a [`minijinja::Value`] at render
//! time, so every field here is directly addressable from templates.

use jinpress_config::{Footer, NavItem};
use jinpress_markdown::TocEntry;
use serde::Serialize;

/// Full context for rendering one page.
#[derive(Debug, Serialize)]
pub struct PageRenderContext {
    pub site: SiteContext,
    pub page: PageContext,
    /// Rendered HTML body (templates must mark it `safe`).
    pub content: String,
    pub toc: Vec<TocEntry>,
    pub nav: Vec<NavItem>,
    /// Sidebar items matched for this page (may be empty).
    pub sidebar: Vec<NavItem>,
    pub footer: Footer,
    /// Resolved "edit this page" link, if configured.
    pub edit_link: Option<EditLinkContext>,
    /// Whether the theme should show the last-updated date.
    pub last_updated: bool,
    pub prev: Option<PageLink>,
    pub next: Option<PageLink>,
}

/// Site-wide template data.
#[derive(Debug, Clone, Serialize)]
pub struct SiteContext {
    pub title: String,
    pub description: String,
    pub lang: String,
    /// Normalized base path (`/` or `/.../`).
    pub base: String,
}

/// Per-page template data.
#[derive(Debug, Clone, Serialize)]
pub struct PageContext {
    pub title: String,
    pub description: String,
    /// Full URL path including the site base.
    pub url: String,
    /// Source path relative to the docs directory (forward slashes).
    pub source_path: String,
    /// Unix timestamp of the source file's last modification.
    pub last_modified: i64,
    /// Raw front matter for theme access.
    pub frontmatter: serde_yaml::Mapping,
}

/// Resolved edit link for one page.
#[derive(Debug, Clone, Serialize)]
pub struct EditLinkContext {
    pub url: String,
    pub text: String,
}

/// Link to an adjacent page (prev/next navigation).
///
/// `link` is a full URL path including the site base.
#[derive(Debug, Clone, Serialize)]
pub struct PageLink {
    pub text: String,
    pub link: String,
}
