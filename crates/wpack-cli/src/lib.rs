//! wpack command line.
//!
//! - [`cli`] - argument definitions
//! - [`commands`] - `build` and `print-config`
//! - [`error`] - [`CliError`] and its miette rendering
//! - [`logger`] - tracing subscriber setup
//! - [`ui`] - spinner and terminal report sink

pub mod cli;
pub mod commands;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
