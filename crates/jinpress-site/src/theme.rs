//! Embedded default theme.
//!
//! Templates and static assets are compiled into the binary so a
//! freshly scaffolded project builds without any theme files on disk.

use std::path::Path;

/// Returns the source of an embedded theme template.
pub(crate) fn template_source(name: &str) -> Option<&'static str> {
    match name {
        "page.html" => Some(include_str!("../theme/templates/page.html")),
        _ => None,
    }
}

/// Embedded theme static assets, written to `assets/` in the output.
const STATIC_ASSETS: &[(&str, &str)] = &[
    ("style.css", include_str!("../theme/static/style.css")),
    ("search.js", include_str!("../theme/static/search.js")),
];

/// Writes the theme's static assets into `<output>/assets/`.
pub(crate) fn write_assets(output_dir: &Path) -> std::io::Result<()> {
    let assets_dir = output_dir.join("assets");
    std::fs::create_dir_all(&assets_dir)?;
    for (name, contents) in STATIC_ASSETS {
        std::fs::write(assets_dir.join(name), contents)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_template_embedded() {
        assert!(template_source("page.html").is_some());
        assert!(template_source("missing.html").is_none());
    }

    #[test]
    fn test_write_assets() {
        let dir = tempfile::tempdir().unwrap();
        write_assets(dir.path()).unwrap();
        assert!(dir.path().join("assets/style.css").exists());
        assert!(dir.path().join("assets/search.js").exists());
    }
}
