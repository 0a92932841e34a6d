//! Build orchestration.
//!
//! One [`Orchestrator::run`] call is one engine invocation:
//!
//! ```text
//! Idle -> Invoking -> Failed(Invocation)
//!                  -> Reporting -> Failed(Result)
//!                               -> Succeeded(report)
//! ```
//!
//! The report is rendered and emitted before it is classified, so callers
//! that receive [`BuildError::Result`] have already seen the diagnostics.

use std::sync::Arc;
use std::time::Instant;

use crate::engine::{BuildReport, BundlerEngine, ConfigSet};
use crate::error::{BuildError, Result};
use crate::sink::{ReportSink, StderrSink};
use crate::stats::StatsOptions;

/// Drives a [`BundlerEngine`] and turns its report into pass/fail.
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use wpack_bundler::{Orchestrator, RolldownEngine};
/// use wpack_config::ProjectDiscovery;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let project = ProjectDiscovery::new(".").load()?;
/// let config = project.synthesize(Path::new("/srv/app"))?;
///
/// let report = Orchestrator::new(RolldownEngine::new()).run(config).await?;
/// # let _ = report;
/// # Ok(())
/// # }
/// ```
pub struct Orchestrator<E> {
    engine: E,
    stats: StatsOptions,
    sink: Arc<dyn ReportSink>,
}

impl<E> std::fmt::Debug for Orchestrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<E: BundlerEngine> Orchestrator<E> {
    /// Orchestrator with default stats options, reporting to stderr.
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            stats: StatsOptions::default(),
            sink: Arc::new(StderrSink),
        }
    }

    pub fn with_stats(mut self, stats: StatsOptions) -> Self {
        self.stats = stats;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn ReportSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn stats(&self) -> &StatsOptions {
        &self.stats
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Build `configs` once.
    ///
    /// - engine error: [`BuildError::Invocation`], nothing is emitted
    /// - report with errors: report emitted, then [`BuildError::Result`]
    /// - otherwise: report emitted and returned
    pub async fn run(&self, configs: impl Into<ConfigSet>) -> Result<E::Report> {
        let configs = configs.into();
        let count = configs.len();
        let started = Instant::now();

        tracing::info!(configs = count, "starting compilation");

        let report = match self.engine.compile(configs).await {
            Ok(report) => report,
            Err(err) => {
                tracing::error!("bundler invocation failed: {:#}", err);
                return Err(BuildError::invocation(&err));
            }
        };

        self.sink.emit(&report.render(&self.stats));

        if report.has_errors() {
            tracing::debug!(elapsed_ms = started.elapsed().as_millis() as u64, "compilation reported errors");
            return Err(BuildError::Result);
        }

        tracing::info!(
            configs = count,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "compilation finished"
        );
        Ok(report)
    }
}

/// Run `configs` through `engine` with default options, reporting to stderr.
pub async fn run<E>(engine: E, configs: impl Into<ConfigSet>) -> Result<E::Report>
where
    E: BundlerEngine,
{
    Orchestrator::new(engine).run(configs).await
}
