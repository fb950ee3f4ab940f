//! `info` command: show project information.

use std::path::{Path, PathBuf};

use clap::Args;
use jinpress_config::Config;
use jinpress_site::Builder;

use crate::error::CliError;
use crate::output::Output;

use super::resolve_project_root;

/// Arguments for the `info` command.
#[derive(Args)]
pub(crate) struct InfoArgs {
    /// Project directory (defaults to the current directory).
    dir: Option<PathBuf>,

    /// Path to the config file (defaults to jinpress.yml in the project root).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl InfoArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let project_root = resolve_project_root(self.dir)?;
        let config = Config::load(self.config.as_deref(), &project_root)?;
        let builder = Builder::new(&project_root, config);
        let config = builder.config();

        output.highlight(&config.site.title);
        if !config.site.description.is_empty() {
            output.info(&config.site.description);
        }
        output.info("");
        output.info(&format!("Project root: {}", project_root.display()));
        if let Some(path) = &config.config_path {
            output.info(&format!("Config file:  {}", path.display()));
        }
        output.info(&format!("Base URL:     {}", config.site.base));
        output.info(&format!("Docs dir:     {}", builder.docs_dir().display()));
        output.info(&format!("Output dir:   {}", builder.output_dir().display()));
        output.info(&format!(
            "Pages:        {}",
            count_markdown_files(builder.docs_dir())
        ));

        Ok(())
    }
}

/// Count markdown files under a directory, skipping hidden entries.
fn count_markdown_files(dir: &Path) -> usize {
    let mut count = 0;
    let mut stack = vec![dir.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let Ok(entries) = std::fs::read_dir(&dir) else {
            continue;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with('.'))
            {
                continue;
            }
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().is_some_and(|ext| ext == "md") {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_count_markdown_files() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir_all(tmp.path().join("guide")).unwrap();
        std::fs::write(tmp.path().join("index.md"), "# Home").unwrap();
        std::fs::write(tmp.path().join("guide/intro.md"), "# Intro").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "not a page").unwrap();
        std::fs::write(tmp.path().join(".draft.md"), "hidden").unwrap();

        assert_eq!(count_markdown_files(tmp.path()), 2);
    }

    #[test]
    fn test_count_missing_directory_is_zero() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(count_markdown_files(&tmp.path().join("missing")), 0);
    }
}
