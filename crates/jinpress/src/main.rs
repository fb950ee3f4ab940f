//! JinPress CLI - static documentation site generator.
//!
//! Provides commands for:
//! - `init`: Scaffold a new documentation project
//! - `build`: Build the static site
//! - `serve`: Start the dev server with live reload
//! - `info`: Show project information

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, InfoArgs, InitArgs, ServeArgs};
use output::Output;

/// JinPress - fast, lightweight documentation sites.
#[derive(Parser)]
#[command(name = "jinpress", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new documentation project.
    Init(InitArgs),
    /// Build the static site.
    Build(BuildArgs),
    /// Start the dev server with live reload.
    Serve(ServeArgs),
    /// Show project information.
    Info(InfoArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let verbose = match &cli.command {
        Commands::Build(args) => args.verbose,
        Commands::Serve(args) => args.verbose,
        Commands::Init(_) | Commands::Info(_) => false,
    };
    let filter = if verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Init(args) => args.execute(),
        Commands::Build(args) => args.execute(),
        Commands::Serve(args) => {
            let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
            rt.block_on(args.execute())
        }
        Commands::Info(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
