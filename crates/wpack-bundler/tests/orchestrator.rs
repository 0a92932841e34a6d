//! Orchestrator behaviour against a scripted engine.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use wpack_bundler::{
    BuildError, BuildReport, BundlerEngine, ConfigSet, EngineError, MemorySink, Orchestrator,
    StatsOptions,
};
use wpack_config::BundleConfig;

#[derive(Debug, Clone, PartialEq)]
struct FakeReport {
    errors: bool,
    text: String,
}

impl BuildReport for FakeReport {
    fn has_errors(&self) -> bool {
        self.errors
    }

    fn render(&self, options: &StatsOptions) -> String {
        format!("{} colors={}", self.text, options.colors)
    }
}

enum Outcome {
    Fail(&'static str),
    Report { errors: bool, text: &'static str },
}

struct FakeEngine {
    outcome: Outcome,
    calls: AtomicUsize,
    seen: Mutex<Vec<usize>>,
}

impl FakeEngine {
    fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl BundlerEngine for FakeEngine {
    type Report = FakeReport;

    async fn compile(&self, configs: ConfigSet) -> Result<FakeReport, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(configs.len());
        match self.outcome {
            Outcome::Fail(message) => Err(anyhow::anyhow!(message)),
            Outcome::Report { errors, text } => Ok(FakeReport {
                errors,
                text: text.to_string(),
            }),
        }
    }
}

fn config(path: &str) -> BundleConfig {
    BundleConfig::from_value(json!({
        "entry": {"api": format!("{path}/api.ts")},
        "output": {"path": format!("{path}/.build")}
    }))
    .unwrap()
}

fn orchestrator(engine: FakeEngine) -> (Orchestrator<FakeEngine>, Arc<MemorySink>) {
    let sink = Arc::new(MemorySink::new());
    let orchestrator = Orchestrator::new(engine).with_sink(sink.clone());
    (orchestrator, sink)
}

#[tokio::test]
async fn engine_failure_is_an_invocation_error() {
    let (orchestrator, sink) = orchestrator(FakeEngine::new(Outcome::Fail("bad config")));

    let err = orchestrator.run(config("/svc")).await.unwrap_err();

    assert!(err.is_invocation());
    assert!(err.to_string().contains("bad config"));
    assert!(sink.is_empty(), "nothing is rendered without a report");
    assert_eq!(orchestrator.engine().calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn report_with_errors_is_emitted_then_fails() {
    let (orchestrator, sink) = orchestrator(FakeEngine::new(Outcome::Report {
        errors: true,
        text: "ERROR in a.ts",
    }));

    let err = orchestrator.run(config("/svc")).await.unwrap_err();

    assert!(matches!(err, BuildError::Result));
    assert_eq!(err.to_string(), "Compilation error, see stats above");
    assert_eq!(sink.reports(), vec!["ERROR in a.ts colors=true"]);
}

#[tokio::test]
async fn clean_report_is_emitted_and_returned() {
    let (orchestrator, sink) = orchestrator(FakeEngine::new(Outcome::Report {
        errors: false,
        text: "OK",
    }));

    let report = orchestrator.run(config("/svc")).await.unwrap();

    assert_eq!(
        report,
        FakeReport {
            errors: false,
            text: "OK".to_string()
        }
    );
    assert_eq!(sink.reports(), vec!["OK colors=true"]);
}

#[tokio::test]
async fn stats_options_reach_the_renderer() {
    let sink = Arc::new(MemorySink::new());
    let orchestrator = Orchestrator::new(FakeEngine::new(Outcome::Report {
        errors: false,
        text: "OK",
    }))
    .with_stats(StatsOptions::plain())
    .with_sink(sink.clone());

    orchestrator.run(config("/svc")).await.unwrap();

    assert!(!orchestrator.stats().colors);
    assert_eq!(sink.reports(), vec!["OK colors=false"]);
}

#[tokio::test]
async fn multiple_configs_are_one_invocation() {
    let (orchestrator, sink) = orchestrator(FakeEngine::new(Outcome::Report {
        errors: false,
        text: "OK",
    }));

    orchestrator
        .run(vec![config("/a"), config("/b"), config("/c")])
        .await
        .unwrap();

    assert_eq!(*orchestrator.engine().seen.lock().unwrap(), vec![3]);
    assert_eq!(sink.reports().len(), 1);
}

#[tokio::test]
async fn shared_engine_serves_repeated_runs() {
    let engine = Arc::new(FakeEngine::new(Outcome::Report {
        errors: false,
        text: "OK",
    }));
    let sink = Arc::new(MemorySink::new());
    let orchestrator = Orchestrator::new(engine.clone()).with_sink(sink.clone());

    orchestrator.run(config("/a")).await.unwrap();
    orchestrator.run(config("/b")).await.unwrap();

    assert_eq!(engine.calls.load(Ordering::SeqCst), 2);
    assert_eq!(sink.reports().len(), 2);
}

#[tokio::test]
async fn free_function_uses_defaults() {
    let result = wpack_bundler::run(FakeEngine::new(Outcome::Fail("no engine")), config("/svc")).await;
    match result {
        Err(BuildError::Invocation { message }) => assert_eq!(message, "no engine"),
        other => panic!("expected invocation error, got {other:?}"),
    }
}
