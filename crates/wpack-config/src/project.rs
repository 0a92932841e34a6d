//! Project file model.
//!
//! A project file declares everything the synthesizer needs: the targets, the
//! base bundler configuration, the default output descriptor and the output
//! folder name. For file discovery and environment overrides, see the
//! `discovery` module.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::error::{ConfigError, Result as ConfigResult};
use crate::overlay::{BundleConfig, ENTRY_KEY, OUTPUT_KEY, OutputMap};
use crate::synth::create_configs;
use crate::target::{FunctionDef, ServiceNaming, TargetList};

pub const DEFAULT_OUTPUT_FOLDER: &str = ".wpack";
pub const DEFAULT_SOURCE_EXTENSION: &str = "ts";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default, alias = "functions")]
    pub targets: TargetList<FunctionDef>,

    #[serde(default)]
    pub base: BundleConfig,

    #[serde(default = "default_output")]
    pub output: OutputMap,

    #[serde(flatten)]
    pub settings: ProjectSettings,
}

/// Scalar settings that may be overridden from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    #[serde(default = "default_output_folder")]
    pub output_folder: String,

    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    #[serde(default)]
    pub stats: StatsSettings,
}

/// Report rendering toggles as written in a project file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSettings {
    #[serde(default = "default_true")]
    pub colors: bool,

    #[serde(default)]
    pub hash: bool,

    #[serde(default)]
    pub chunks: bool,

    #[serde(default)]
    pub version: bool,
}

impl Default for StatsSettings {
    fn default() -> Self {
        Self {
            colors: true,
            hash: false,
            chunks: false,
            version: false,
        }
    }
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            output_folder: default_output_folder(),
            source_extension: default_source_extension(),
            stats: StatsSettings::default(),
        }
    }
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            targets: TargetList::new(),
            base: BundleConfig::default(),
            output: default_output(),
            settings: ProjectSettings::default(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_output_folder() -> String {
    DEFAULT_OUTPUT_FOLDER.to_string()
}

fn default_source_extension() -> String {
    DEFAULT_SOURCE_EXTENSION.to_string()
}

fn default_output() -> OutputMap {
    match json!({ "filename": "[name].js" }) {
        Value::Object(map) => map,
        _ => OutputMap::new(),
    }
}

impl ProjectConfig {
    /// Create from serde_json::Value (for programmatic config)
    ///
    /// # Example
    ///
    /// ```
    /// use wpack_config::ProjectConfig;
    /// use serde_json::json;
    ///
    /// let config = ProjectConfig::from_value(json!({
    ///     "targets": { "api": { "name": "api", "path": "handler.js" } },
    ///     "output_folder": ".build"
    /// }))
    /// .unwrap();
    ///
    /// assert_eq!(config.targets.len(), 1);
    /// assert_eq!(config.settings.output_folder, ".build");
    /// ```
    pub fn from_value(value: Value) -> ConfigResult<Self> {
        serde_json::from_value(value).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    pub fn to_value(&self) -> ConfigResult<Value> {
        serde_json::to_value(self).map_err(|e| ConfigError::InvalidValue {
            field: "config".to_string(),
            message: e.to_string(),
        })
    }

    /// Check the invariants the synthesizer relies on.
    ///
    /// `entry` and `output` in the base configuration are not errors, they
    /// are replaced during synthesis and only logged.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }

        let folder = self.settings.output_folder.trim();
        if folder.is_empty() {
            return Err(ConfigError::InvalidOutputFolder {
                folder: self.settings.output_folder.clone(),
                reason: "must not be empty".to_string(),
            });
        }
        if Path::new(folder).is_absolute() {
            return Err(ConfigError::InvalidOutputFolder {
                folder: self.settings.output_folder.clone(),
                reason: "must be relative to the project directory".to_string(),
            });
        }

        let extension = self.settings.source_extension.trim().trim_start_matches('.');
        if extension.is_empty() || extension.contains(['/', '\\']) {
            return Err(ConfigError::InvalidValue {
                field: "source_extension".to_string(),
                message: format!(
                    "`{}` is not a file extension",
                    self.settings.source_extension
                ),
            });
        }

        for key in [ENTRY_KEY, OUTPUT_KEY] {
            if self.base.contains_key(key) {
                tracing::warn!("base configuration sets `{}`, it will be replaced", key);
            }
        }

        Ok(())
    }

    pub fn naming(&self) -> ServiceNaming {
        ServiceNaming::new(self.settings.source_extension.clone())
    }

    /// Validate and synthesize the bundler configuration rooted at `base_dir`.
    pub fn synthesize(&self, base_dir: &Path) -> ConfigResult<BundleConfig> {
        self.validate()?;
        let config = create_configs(
            &self.naming(),
            &self.targets,
            &self.base,
            base_dir,
            &self.output,
            &self.settings.output_folder,
        )?;
        tracing::debug!(
            targets = self.targets.len(),
            output = config.output_path().unwrap_or_default(),
            "synthesized bundler configuration"
        );
        Ok(config)
    }
}
