//! `build` command: produce the static site.

use std::path::PathBuf;

use clap::Args;
use jinpress_config::Config;
use jinpress_site::Builder;

use crate::error::CliError;
use crate::output::Output;

use super::resolve_project_root;

/// Arguments for the `build` command.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Project directory (defaults to the current directory).
    dir: Option<PathBuf>,

    /// Path to the config file (defaults to jinpress.yml in the project root).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Wipe the output directory before building (the default).
    #[arg(long, overrides_with = "no_clean")]
    clean: bool,

    /// Keep the existing output directory instead of wiping it first.
    #[arg(long, overrides_with = "clean")]
    no_clean: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let project_root = resolve_project_root(self.dir)?;
        let config = Config::load(self.config.as_deref(), &project_root)?;

        output.info(&format!("Building {}...", config.site.title));
        let builder = Builder::new(&project_root, config);
        let result = builder.build(self.clean || !self.no_clean);

        for warning in &result.warnings {
            output.warning(&format!("warning: {warning}"));
        }

        if !result.success {
            for error in &result.errors {
                output.error(&format!("error: {error}"));
            }
            return Err(CliError::Build("Build failed".to_owned()));
        }

        output.success(&format!(
            "Built {} pages in {}ms -> {}",
            result.pages_built,
            result.duration_ms,
            builder.output_dir().display()
        ));
        Ok(())
    }
}
