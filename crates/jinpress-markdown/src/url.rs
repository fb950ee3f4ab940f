//! URL path derivation for markdown sources.

use std::path::Path;

/// Derives the site URL path for a markdown source file.
///
/// `relative` is the path of the file relative to the docs directory;
/// `base` is the normalized site base (leading and trailing slash).
/// The `.md` extension is stripped, a trailing `index` segment is
/// collapsed into its directory, and the result always ends with `/`:
///
/// - `index.md` → `/`
/// - `guide/getting-started.md` → `/guide/getting-started/`
/// - `guide/index.md` → `/guide/`
///
/// With `base` `/docs/`, the same inputs gain the `/docs` prefix.
#[must_use]
pub fn url_path_for(relative: &Path, base: &str) -> String {
    let mut segments: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if let Some(last) = segments.last_mut() {
        if let Some(stem) = last.strip_suffix(".md") {
            *last = stem.to_owned();
        }
        if last == "index" {
            segments.pop();
        }
    }

    let prefix = base.trim_end_matches('/');
    if segments.is_empty() {
        format!("{prefix}/")
    } else {
        format!("{prefix}/{}/", segments.join("/"))
    }
}

/// Strips the site base from a URL path, yielding the route used for
/// sidebar matching and output placement (always starts with `/`).
#[must_use]
pub fn strip_base<'a>(url_path: &'a str, base: &str) -> &'a str {
    let prefix = base.trim_end_matches('/');
    if prefix.is_empty() {
        return url_path;
    }
    match url_path.strip_prefix(prefix) {
        Some(route) if route.starts_with('/') => route,
        Some("") => "/",
        _ => url_path,
    }
}
