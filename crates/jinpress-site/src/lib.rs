//! Static site building for JinPress.
//!
//! The [`Builder`] drives a full build: enumerate markdown sources,
//! process each page, render it through the template engine, copy
//! static and theme assets, and emit the client-side search index.
//! Per-page failures degrade to warnings; a build only fails outright
//! when the output directory itself cannot be produced.

mod builder;
mod context;
mod search;
mod templates;
mod theme;

pub use builder::{BuildResult, Builder};
pub use context::{EditLinkContext, PageContext, PageLink, PageRenderContext, SiteContext};
pub use search::{SearchDocument, SearchIndexer};
pub use templates::{TemplateEngine, TemplateError};
