//! File-based project discovery for CLI use
//!
//! Finds and loads a wpack project file, then applies `WPACK_*` environment
//! overrides to the scalar settings.

use std::fs;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Serialized},
};
use serde_json::Value;

use crate::error::{ConfigError, Result};
use crate::project::{ProjectConfig, ProjectSettings};

/// Environment prefix for setting overrides (`WPACK_OUTPUT_FOLDER`, `WPACK_STATS__HASH`).
pub const ENV_PREFIX: &str = "WPACK_";

const CANDIDATES: [&str; 3] = ["wpack.toml", "wpack.json", "package.json"];

/// Project file discovery rooted at a directory.
///
/// # Example
///
/// ```no_run
/// use wpack_config::ProjectDiscovery;
///
/// let discovery = ProjectDiscovery::new(".");
/// let project = discovery.load().unwrap();
/// ```
pub struct ProjectDiscovery {
    root: PathBuf,
}

impl ProjectDiscovery {
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Find a project file in the root directory
    ///
    /// Searches in this order:
    /// 1. wpack.toml
    /// 2. wpack.json
    /// 3. package.json (only when it has a `wpack` field)
    pub fn find(&self) -> Option<PathBuf> {
        CANDIDATES
            .iter()
            .map(|name| self.root.join(name))
            .find(|path| match path.file_name().and_then(|n| n.to_str()) {
                Some("package.json") => package_json_has_field(path),
                _ => path.is_file(),
            })
    }

    /// Load the discovered project file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no project file is found.
    pub fn load(&self) -> Result<ProjectConfig> {
        let path = self
            .find()
            .ok_or_else(|| ConfigError::NotFound(self.root.join(CANDIDATES[0])))?;
        self.load_from(&path)
    }

    /// Load a specific project file. Relative paths resolve against the root.
    pub fn load_from(&self, path: &Path) -> Result<ProjectConfig> {
        let path = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        if !path.is_file() {
            return Err(ConfigError::NotFound(path));
        }

        tracing::debug!(path = %path.display(), "loading project file");

        let value = read_project_value(&path)?;
        let mut config = ProjectConfig::from_value(value)?;
        config.settings = apply_env_overrides(&config.settings)?;
        Ok(config)
    }
}

fn read_project_value(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)?;
    let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();

    if file_name == "package.json" {
        let parsed: Value = serde_json::from_str(&content).map_err(|e| invalid("package.json", e))?;
        return match parsed.get("wpack") {
            Some(value) if !value.is_null() => Ok(value.clone()),
            _ => Err(ConfigError::InvalidValue {
                field: "wpack".to_string(),
                message: "add a `wpack` field to package.json".to_string(),
            }),
        };
    }

    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => {
            let parsed: toml::Value = toml::from_str(&content).map_err(|e| invalid("toml", e))?;
            serde_json::to_value(parsed).map_err(|e| invalid("toml", e))
        }
        Some("json") => serde_json::from_str(&content).map_err(|e| invalid("json", e)),
        other => Err(ConfigError::UnsupportedFormat(
            other.unwrap_or(file_name).to_string(),
        )),
    }
}

fn package_json_has_field(path: &Path) -> bool {
    fs::read_to_string(path)
        .ok()
        .and_then(|content| serde_json::from_str::<Value>(&content).ok())
        .is_some_and(|parsed| parsed.get("wpack").is_some_and(|v| !v.is_null()))
}

fn invalid(field: &str, err: impl std::fmt::Display) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        message: err.to_string(),
    }
}

/// Merge `WPACK_*` environment variables over `settings`.
///
/// Nested keys use a double underscore: `WPACK_STATS__COLORS=false`.
pub fn apply_env_overrides(settings: &ProjectSettings) -> Result<ProjectSettings> {
    Figment::new()
        .merge(Serialized::defaults(settings))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|e| invalid("environment", e))
}

/// Discover and load a project from the current directory (convenience function)
pub fn discover() -> Result<ProjectConfig> {
    let root = std::env::current_dir()?;
    ProjectDiscovery::new(&root).load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn find_returns_none_when_no_project() {
        let dir = TempDir::new().unwrap();
        assert!(ProjectDiscovery::new(dir.path()).find().is_none());
    }

    #[test]
    fn toml_takes_precedence_over_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wpack.json"), "{}").unwrap();
        fs::write(dir.path().join("wpack.toml"), "").unwrap();
        assert_eq!(
            ProjectDiscovery::new(dir.path()).find().unwrap(),
            dir.path().join("wpack.toml")
        );
    }

    #[test]
    fn package_json_without_field_is_skipped() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("package.json"), r#"{"name": "svc"}"#).unwrap();
        assert!(ProjectDiscovery::new(dir.path()).find().is_none());

        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "svc", "wpack": {"targets": {}}}"#,
        )
        .unwrap();
        assert!(ProjectDiscovery::new(dir.path()).find().is_some());
    }

    #[test]
    fn load_returns_not_found_when_no_project() {
        let dir = TempDir::new().unwrap();
        let err = ProjectDiscovery::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("wpack.yaml");
        fs::write(&path, "targets: {}").unwrap();
        let err = ProjectDiscovery::new(dir.path()).load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ext) if ext == "yaml"));
    }

    #[test]
    fn invalid_toml_is_reported() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("wpack.toml"), "targets = [").unwrap();
        let err = ProjectDiscovery::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { field, .. } if field == "toml"));
    }
}
