//! Full site builds.

use std::path::{Path, PathBuf};
use std::time::Instant;

use jinpress_config::Config;
use jinpress_markdown::{MarkdownProcessor, ProcessedPage, strip_base};

use crate::context::{
    EditLinkContext, PageContext, PageLink, PageRenderContext, SiteContext,
};
use crate::search::SearchIndexer;
use crate::templates::TemplateEngine;
use crate::theme;

/// Outcome of one build.
///
/// `success` is false only for fatal problems (the output directory
/// could not be produced, the docs directory is missing). Per-page
/// failures are reported in `warnings` and leave `success` true.
#[derive(Debug, Clone)]
pub struct BuildResult {
    pub success: bool,
    pub pages_built: usize,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub duration_ms: u64,
}

/// Builds a project's static site into its output directory.
///
/// The builder is immutable and shareable; each [`build`](Self::build)
/// call is self-contained, so a dev server can hold one in an `Arc`
/// and rebuild repeatedly.
pub struct Builder {
    project_root: PathBuf,
    config: Config,
    docs_dir: PathBuf,
    static_dir: PathBuf,
    output_dir: PathBuf,
    engine: TemplateEngine,
    processor: MarkdownProcessor,
}

impl Builder {
    pub fn new(project_root: impl Into<PathBuf>, config: Config) -> Self {
        let project_root = project_root.into();
        let docs_dir = project_root.join("docs");
        let static_dir = project_root.join("static");
        let templates_dir = project_root.join("templates");
        let output_dir = project_root.join("dist");
        let base = config.base();
        let engine = TemplateEngine::new(Some(templates_dir), &base);
        let processor = MarkdownProcessor::new(base);
        Self {
            project_root,
            config,
            docs_dir,
            static_dir,
            output_dir,
            engine,
            processor,
        }
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn docs_dir(&self) -> &Path {
        &self.docs_dir
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runs a full build. With `clean`, the output directory is
    /// removed first.
    pub fn build(&self, clean: bool) -> BuildResult {
        let start = Instant::now();
        let mut warnings = Vec::new();
        let mut errors = Vec::new();

        let pages_built = match self.build_inner(clean, &mut warnings) {
            Ok(count) => count,
            Err(message) => {
                errors.push(message);
                0
            }
        };

        BuildResult {
            success: errors.is_empty(),
            pages_built,
            errors,
            warnings,
            duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        }
    }

    fn build_inner(&self, clean: bool, warnings: &mut Vec<String>) -> Result<usize, String> {
        if clean && self.output_dir.exists() {
            std::fs::remove_dir_all(&self.output_dir)
                .map_err(|err| format!("Failed to clean {}: {err}", self.output_dir.display()))?;
        }
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|err| format!("Failed to create {}: {err}", self.output_dir.display()))?;
        if !self.docs_dir.is_dir() {
            return Err(format!(
                "Docs directory not found: {}",
                self.docs_dir.display()
            ));
        }

        let sources = collect_markdown_files(&self.docs_dir)
            .map_err(|err| format!("Failed to scan {}: {err}", self.docs_dir.display()))?;

        let mut pages = Vec::with_capacity(sources.len());
        for path in &sources {
            match self.processor.process_file(path, &self.docs_dir) {
                Ok(page) => pages.push(page),
                Err(err) => warnings.push(err.to_string()),
            }
        }

        let base = self.config.base();

        // A page that fails to render is dropped entirely: no HTML
        // output, no search-index entry, and neighbors' prev/next must
        // not link to it. The first pass finds the failures; when any
        // exist, the survivors are rendered again with prev/next
        // recomputed over the surviving set.
        let all: Vec<&ProcessedPage> = pages.iter().collect();
        let mut outputs = self.render_pages(&all, &base, warnings);
        let mut kept: Vec<&ProcessedPage> = prune_failures(&all, &outputs);
        if kept.len() != all.len() {
            outputs = self.render_pages(&kept, &base, warnings);
            kept = prune_failures(&kept, &outputs);
        }

        let mut indexer = SearchIndexer::new();
        for page in &kept {
            indexer.add_page(page, &self.config.site.description);
        }

        let mut pages_built = 0;
        for (page, html) in kept.iter().zip(outputs.into_iter().flatten()) {
            let out_path = self.output_path(strip_base(&page.url_path, &base));
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|err| format!("Failed to create {}: {err}", parent.display()))?;
            }
            std::fs::write(&out_path, html)
                .map_err(|err| format!("Failed to write {}: {err}", out_path.display()))?;
            tracing::debug!(page = %page.relative_path.display(), "rendered page");
            pages_built += 1;
        }

        if self.static_dir.is_dir()
            && let Err(err) = copy_dir_all(&self.static_dir, &self.output_dir.join("static"))
        {
            warnings.push(format!("Failed to copy static files: {err}"));
        }
        if let Err(err) = theme::write_assets(&self.output_dir) {
            warnings.push(format!("Failed to write theme assets: {err}"));
        }
        indexer
            .write_index(&self.output_dir.join("search-index.json"))
            .map_err(|err| format!("Failed to write search index: {err}"))?;
        // Keeps GitHub Pages from running the output through Jekyll.
        std::fs::write(self.output_dir.join(".nojekyll"), "")
            .map_err(|err| format!("Failed to write .nojekyll: {err}"))?;

        tracing::info!(pages = pages_built, "site built");
        Ok(pages_built)
    }

    /// Renders every page against the given page list; a failure
    /// yields `None` in that slot and a warning.
    fn render_pages(
        &self,
        pages: &[&ProcessedPage],
        base: &str,
        warnings: &mut Vec<String>,
    ) -> Vec<Option<String>> {
        let mut outputs = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            let context = self.page_context(pages, i, base);
            match self.engine.render("page.html", &context) {
                Ok(html) => outputs.push(Some(html)),
                Err(err) => {
                    warnings.push(format!(
                        "Failed to render {}: {err}",
                        page.relative_path.display()
                    ));
                    outputs.push(None);
                }
            }
        }
        outputs
    }

    fn page_context(
        &self,
        pages: &[&ProcessedPage],
        index: usize,
        base: &str,
    ) -> PageRenderContext {
        let page = pages[index];
        let route = strip_base(&page.url_path, base);
        let sidebar = self.config.theme.sidebar.items_for(route).to_vec();
        let source_path = page
            .relative_path
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        let edit_link = &self.config.theme.edit_link;
        let edit_link = (!edit_link.pattern.is_empty()).then(|| EditLinkContext {
            url: edit_link.pattern.replace(":path", &source_path),
            text: if edit_link.text.is_empty() {
                "Edit this page".to_owned()
            } else {
                edit_link.text.clone()
            },
        });

        let prev = index.checked_sub(1).map(|i| page_link(pages[i]));
        let next = pages.get(index + 1).map(|p| page_link(p));

        PageRenderContext {
            site: SiteContext {
                title: self.config.site.title.clone(),
                description: self.config.site.description.clone(),
                lang: self.config.site.lang.clone(),
                base: base.to_owned(),
            },
            page: PageContext {
                title: page.title.clone(),
                description: page.description.clone(),
                url: page.url_path.clone(),
                source_path,
                last_modified: page.last_modified,
                frontmatter: page.frontmatter.clone(),
            },
            content: page.content.clone(),
            toc: page.toc.clone(),
            nav: self.config.theme.nav.clone(),
            sidebar,
            footer: self.config.theme.footer.clone(),
            edit_link,
            last_updated: self.config.theme.last_updated,
            prev,
            next,
        }
    }

    /// Filesystem location for a route: `/guide/intro/` maps to
    /// `dist/guide/intro/index.html`.
    fn output_path(&self, route: &str) -> PathBuf {
        let mut path = self.output_dir.clone();
        for segment in route.split('/').filter(|s| !s.is_empty()) {
            path.push(segment);
        }
        path.join("index.html")
    }
}

/// Keeps the pages whose render slot holds output.
fn prune_failures<'a>(
    pages: &[&'a ProcessedPage],
    outputs: &[Option<String>],
) -> Vec<&'a ProcessedPage> {
    pages
        .iter()
        .zip(outputs)
        .filter_map(|(page, output)| output.is_some().then_some(*page))
        .collect()
}

fn page_link(page: &ProcessedPage) -> PageLink {
    PageLink {
        text: page.title.clone(),
        link: page.url_path.clone(),
    }
}

/// Collects `.md` files under `dir` recursively, skipping hidden
/// entries, sorted by path for deterministic ordering.
fn collect_markdown_files(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    walk_markdown(dir, &mut files)?;
    files.sort();
    Ok(files)
}

fn walk_markdown(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }
        if path.is_dir() {
            walk_markdown(&path, files)?;
        } else if path.extension().is_some_and(|ext| ext == "md") {
            files.push(path);
        }
    }
    Ok(())
}

fn copy_dir_all(src: &Path, dst: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dst)?;
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());
        if src_path.is_dir() {
            copy_dir_all(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}
