//! `wpack build`.

use std::sync::Arc;
use std::time::Instant;

use wpack_bundler::{Orchestrator, RolldownEngine, StatsOptions, format_size};

use crate::cli::BuildArgs;
use crate::commands::load_project;
use crate::error::Result;
use crate::logger::should_use_colors;
use crate::ui::Spinner;

/// Output switches that come from the global flags rather than `BuildArgs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Output {
    pub quiet: bool,
    pub no_color: bool,
}

/// Load the project, synthesize its configuration and build it once.
///
/// The build report is printed to stderr before any error is returned.
pub async fn execute(args: BuildArgs, output: Output) -> Result<()> {
    let started = Instant::now();
    let project = load_project(&args.project)?;
    let config = project.config.synthesize(&project.root)?;

    let settings = StatsOptions::from(project.config.settings.stats);
    let stats = stats_options(&args, &settings, output);
    let spinner = if output.quiet {
        Spinner::hidden()
    } else {
        Spinner::new(&format!("Building {} function(s)...", project.config.targets.len()))
    };

    let orchestrator = Orchestrator::new(RolldownEngine::new().with_cwd(&project.root))
        .with_stats(stats)
        .with_sink(Arc::new(spinner.sink()));

    match orchestrator.run(config).await {
        Ok(report) => {
            let size: usize = report.bundles.iter().map(|b| b.total_size()).sum();
            spinner.finish(&format!(
                "Built {} asset(s), {} in {:.2}s",
                report.assets().count(),
                format_size(size),
                started.elapsed().as_secs_f64()
            ));
            Ok(())
        }
        Err(err) => {
            spinner.fail("Build failed");
            Err(err.into())
        }
    }
}

/// Project stats settings, with CLI flags switching extra lines on and
/// `--no-color` / `NO_COLOR` switching colours off.
fn stats_options(args: &BuildArgs, settings: &StatsOptions, output: Output) -> StatsOptions {
    StatsOptions {
        colors: settings.colors && !output.no_color && should_use_colors(),
        hash: settings.hash || args.hash,
        chunks: settings.chunks || args.chunks,
        version: settings.version || args.show_version,
    }
}
