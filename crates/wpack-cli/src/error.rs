//! CLI error type and its miette rendering.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

/// Top-level CLI error, converted from the library errors via `#[from]`.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] wpack_config::ConfigError),

    #[error(transparent)]
    Build(#[from] wpack_bundler::BuildError),

    #[error("Project directory not found: {}", .0.display())]
    ProjectDirNotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    fn help(&self) -> Option<&'static str> {
        use wpack_config::ConfigError;

        match self {
            CliError::Config(ConfigError::NotFound(_)) => Some(
                "Create a wpack.toml in the project directory, add a `wpack` field to package.json, or pass --config <path>",
            ),
            CliError::Config(ConfigError::NoTargets) => {
                Some("Declare at least one function under [targets] (or `functions`)")
            }
            CliError::Config(ConfigError::Naming(_)) => {
                Some("Give every function either a `path` or a `handler` of the form <file>.<export>")
            }
            CliError::ProjectDirNotFound(_) => Some("Check the --cwd argument"),
            _ => None,
        }
    }
}

/// Convert a [`CliError`] into a miette report for display.
pub fn cli_error_to_miette(err: CliError) -> miette::Report {
    match err {
        CliError::Build(build) => miette::Report::new(build),
        other => match other.help() {
            Some(help) => miette::miette!(help = help, "{}", other),
            None => miette::miette!("{}", other),
        },
    }
}
