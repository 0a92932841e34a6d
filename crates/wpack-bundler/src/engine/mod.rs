//! The bundler engine seam.
//!
//! The orchestrator never talks to a bundler directly. It hands a
//! [`ConfigSet`] to a [`BundlerEngine`] and gets back either an opaque
//! [`EngineError`] (the build could not be attempted) or a report
//! implementing [`BuildReport`].

mod rolldown;

pub use self::rolldown::RolldownEngine;

use async_trait::async_trait;
use wpack_config::BundleConfig;

use crate::stats::StatsOptions;

/// Opaque invocation failure raised by an engine.
pub type EngineError = anyhow::Error;

/// One configuration, or an ordered list built as independent bundles in a
/// single invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSet {
    Single(BundleConfig),
    Multiple(Vec<BundleConfig>),
}

impl ConfigSet {
    /// Configurations in submission order.
    pub fn configs(&self) -> &[BundleConfig] {
        match self {
            ConfigSet::Single(config) => std::slice::from_ref(config),
            ConfigSet::Multiple(configs) => configs,
        }
    }

    pub fn into_configs(self) -> Vec<BundleConfig> {
        match self {
            ConfigSet::Single(config) => vec![config],
            ConfigSet::Multiple(configs) => configs,
        }
    }

    pub fn len(&self) -> usize {
        self.configs().len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs().is_empty()
    }
}

impl From<BundleConfig> for ConfigSet {
    fn from(config: BundleConfig) -> Self {
        ConfigSet::Single(config)
    }
}

impl From<Vec<BundleConfig>> for ConfigSet {
    fn from(configs: Vec<BundleConfig>) -> Self {
        ConfigSet::Multiple(configs)
    }
}

/// Result of one engine invocation.
pub trait BuildReport: Send {
    /// Whether any submitted configuration failed to compile.
    fn has_errors(&self) -> bool;

    /// Human-readable summary.
    fn render(&self, options: &StatsOptions) -> String;
}

/// A bundler that compiles configurations into artifacts.
#[async_trait]
pub trait BundlerEngine: Send + Sync {
    type Report: BuildReport;

    /// Build every configuration in `configs`.
    ///
    /// `Err` is reserved for failures that prevent the build from being
    /// attempted. Compilation errors belong in the report.
    async fn compile(&self, configs: ConfigSet) -> Result<Self::Report, EngineError>;
}

#[async_trait]
impl<E> BundlerEngine for std::sync::Arc<E>
where
    E: BundlerEngine + ?Sized,
{
    type Report = E::Report;

    async fn compile(&self, configs: ConfigSet) -> Result<Self::Report, EngineError> {
        (**self).compile(configs).await
    }
}
