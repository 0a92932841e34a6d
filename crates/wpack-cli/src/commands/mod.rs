//! Command implementations.
//!
//! - [`build`] - synthesize and build the project
//! - [`print_config`] - print the synthesized configuration

pub mod build;
pub mod print_config;

pub use build::execute as build_execute;
pub use print_config::execute as print_config_execute;

use std::path::PathBuf;

use wpack_config::{ProjectConfig, ProjectDiscovery};

use crate::cli::ProjectArgs;
use crate::error::{CliError, Result};

/// Project directory and its loaded configuration, with CLI overrides applied.
pub(crate) struct LoadedProject {
    pub root: PathBuf,
    pub config: ProjectConfig,
}

pub(crate) fn load_project(args: &ProjectArgs) -> Result<LoadedProject> {
    let root = match &args.cwd {
        Some(dir) if dir.is_absolute() => dir.clone(),
        Some(dir) => std::env::current_dir()?.join(dir),
        None => std::env::current_dir()?,
    };
    if !root.is_dir() {
        return Err(CliError::ProjectDirNotFound(root));
    }

    let discovery = ProjectDiscovery::new(&root);
    let mut config = match &args.config {
        Some(path) => discovery.load_from(path)?,
        None => discovery.load()?,
    };

    if let Some(folder) = &args.folder {
        config.settings.output_folder = folder.clone();
    }

    tracing::debug!(
        root = %root.display(),
        targets = config.targets.len(),
        "loaded project"
    );

    Ok(LoadedProject { root, config })
}
