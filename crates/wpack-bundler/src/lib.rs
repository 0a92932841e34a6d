#![cfg_attr(docsrs, feature(doc_cfg))]

//! # wpack-bundler
//!
//! Runs a bundler engine over configurations produced by `wpack-config` and
//! turns the engine's report into a pass/fail outcome.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wpack_bundler::{MemorySink, Orchestrator, RolldownEngine, StatsOptions};
//! use wpack_config::discover;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let project = discover()?;
//! let config = project.synthesize(&std::env::current_dir()?)?;
//!
//! let sink = Arc::new(MemorySink::new());
//! let orchestrator = Orchestrator::new(RolldownEngine::new())
//!     .with_stats(StatsOptions::plain())
//!     .with_sink(sink.clone());
//!
//! match orchestrator.run(config).await {
//!     Ok(_report) => println!("{}", sink.reports().join("\n")),
//!     Err(err) => eprintln!("{err}"),
//! }
//! # Ok(()) }
//! ```
//!
//! ## Logging
//!
//! The crate emits `tracing` events and installs no subscriber. Enable the
//! `logging` feature for [`logging::init_logging`].

pub mod diagnostics;
pub mod engine;
pub mod error;
mod orchestrator;
mod output;
pub mod report;
pub mod sink;
pub mod stats;

#[cfg(feature = "logging")]
#[cfg_attr(docsrs, doc(cfg(feature = "logging")))]
pub mod logging;

pub use diagnostics::{Diagnostic, DiagnosticKind, Severity};
pub use engine::{BuildReport, BundlerEngine, ConfigSet, EngineError, RolldownEngine};
pub use error::{BuildError, Result};
pub use orchestrator::{Orchestrator, run};
pub use report::{AssetStats, BundleStats, CompilationReport, format_size};
pub use sink::{MemorySink, ReportSink, StderrSink};
pub use stats::StatsOptions;

#[cfg(feature = "logging")]
pub use logging::{LogLevel, init_logging, init_logging_from_env};
