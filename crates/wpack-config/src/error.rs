//! Error types for project loading and target naming.

use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // Config parsing/loading errors
    #[error("config not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("unsupported configuration format: {0}")]
    UnsupportedFormat(String),

    #[error("invalid config value for `{field}`: {message}")]
    InvalidValue { field: String, message: String },

    // Schema validation errors (no filesystem checks)
    #[error("no targets specified")]
    NoTargets,

    #[error("invalid output folder `{folder}`: {reason}")]
    InvalidOutputFolder { folder: String, reason: String },

    // Propagated from the default naming resolver
    #[error(transparent)]
    Naming(#[from] NamingError),

    // I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failures raised by [`ServiceNaming`](crate::ServiceNaming) while resolving a target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NamingError {
    #[error("target `{key}` resolves to an empty name")]
    EmptyName { key: String },

    #[error("target `{key}` has neither a `path` nor a `handler`")]
    MissingHandler { key: String },

    #[error("target `{key}` has an invalid handler `{handler}` (expected `<file>.<export>`)")]
    InvalidHandler { key: String, handler: String },
}
