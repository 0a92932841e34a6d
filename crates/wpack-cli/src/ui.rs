//! Terminal output: the build spinner and the report sink that shares its line.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use wpack_bundler::{ReportSink, StderrSink};

/// Spinner shown while a build runs.
pub struct Spinner {
    pb: ProgressBar,
}

impl Spinner {
    pub fn new(message: &str) -> Self {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
            pb.set_style(style.tick_strings(&["◐", "◓", "◑", "◒", "●"]));
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(100));
        Self { pb }
    }

    /// Hidden spinner for quiet runs and non-interactive output.
    pub fn hidden() -> Self {
        Self {
            pb: ProgressBar::hidden(),
        }
    }

    /// Sink that writes reports above the spinner line.
    pub fn sink(&self) -> SpinnerSink {
        SpinnerSink {
            pb: self.pb.clone(),
        }
    }

    pub fn finish(&self, message: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("{} {}", "✓".green(), message);
        }
    }

    pub fn fail(&self, message: &str) {
        self.pb.finish_and_clear();
        if !self.pb.is_hidden() {
            eprintln!("{} {}", "✗".red(), message);
        }
    }
}

/// [`ReportSink`] that suspends the spinner while the report is printed.
pub struct SpinnerSink {
    pb: ProgressBar,
}

impl ReportSink for SpinnerSink {
    fn emit(&self, text: &str) {
        self.pb.suspend(|| StderrSink.emit(text));
    }
}
