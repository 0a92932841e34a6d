//! Destinations for rendered build reports.

use std::sync::{Mutex, MutexGuard, PoisonError};

use console::Term;

/// Receives the human-readable report text of every completed build.
pub trait ReportSink: Send + Sync {
    fn emit(&self, text: &str);
}

/// Writes reports to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl ReportSink for StderrSink {
    fn emit(&self, text: &str) {
        if let Err(err) = Term::stderr().write_line(text) {
            tracing::warn!("failed to write build report: {}", err);
        }
    }
}

/// Keeps every emitted report in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    reports: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports emitted so far, oldest first.
    pub fn reports(&self) -> Vec<String> {
        self.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic elsewhere never leaves the list half-pushed.
    fn lock(&self) -> MutexGuard<'_, Vec<String>> {
        self.reports.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ReportSink for MemorySink {
    fn emit(&self, text: &str) {
        self.lock().push(text.to_string());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn memory_sink_records_in_order() {
        let sink = MemorySink::new();
        assert!(sink.is_empty());
        sink.emit("first");
        sink.emit("second");
        assert_eq!(sink.reports(), vec!["first", "second"]);
    }

    #[test]
    fn memory_sink_survives_poisoned_lock() {
        let sink = Arc::new(MemorySink::new());
        sink.emit("before");

        let holder = Arc::clone(&sink);
        let panicked = std::thread::spawn(move || {
            let _guard = holder.reports.lock().unwrap();
            panic!("report consumer crashed");
        })
        .join();
        assert!(panicked.is_err());
        assert!(sink.reports.is_poisoned());

        sink.emit("after");
        assert!(!sink.is_empty());
        assert_eq!(sink.reports(), vec!["before", "after"]);
    }
}
