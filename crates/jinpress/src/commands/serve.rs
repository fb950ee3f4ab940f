//! `serve` command: dev server with live reload.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use jinpress_config::Config;
use jinpress_server::{run_server, ServeOptions};
use jinpress_site::Builder;

use crate::error::CliError;
use crate::output::Output;

use super::resolve_project_root;

/// Arguments for the `serve` command.
#[derive(Args)]
pub(crate) struct ServeArgs {
    /// Project directory (defaults to the current directory).
    dir: Option<PathBuf>,

    /// Path to the config file (defaults to jinpress.yml in the project root).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Host to bind to.
    #[arg(long, default_value = "127.0.0.1", env = "JINPRESS_HOST")]
    host: String,

    /// Port to bind to.
    #[arg(short, long, default_value_t = 8000, env = "JINPRESS_PORT")]
    port: u16,

    /// Do not open a browser after the server starts.
    #[arg(long)]
    no_open: bool,

    /// Enable verbose logging.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

impl ServeArgs {
    pub(crate) async fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let project_root = resolve_project_root(self.dir)?;
        let config = Config::load(self.config.as_deref(), &project_root)?;

        output.info(&format!("Starting dev server for {}", config.site.title));
        let builder = Arc::new(Builder::new(&project_root, config));

        let options = ServeOptions {
            host: self.host,
            port: self.port,
            open_browser: !self.no_open,
        };
        run_server(builder, options).await?;
        Ok(())
    }
}
