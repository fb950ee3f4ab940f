//! CLI subcommand implementations.

pub(crate) mod build;
pub(crate) mod info;
pub(crate) mod init;
pub(crate) mod serve;

pub(crate) use build::BuildArgs;
pub(crate) use info::InfoArgs;
pub(crate) use init::InitArgs;
pub(crate) use serve::ServeArgs;

use std::path::PathBuf;

use crate::error::CliError;

/// Resolve the project root for a command, defaulting to the current
/// directory when no explicit path is given.
pub(crate) fn resolve_project_root(dir: Option<PathBuf>) -> Result<PathBuf, CliError> {
    let root = match dir {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::Validation(format!(
            "Project directory not found: {}",
            root.display()
        )));
    }
    Ok(root)
}
