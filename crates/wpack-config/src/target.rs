//! Build targets and the naming collaborator that resolves them.
//!
//! A target list maps a logical key to a raw descriptor. The descriptor's
//! shape belongs to whoever declares the targets, so the synthesizer only
//! talks to it through [`TargetNaming`]: one call for the display name (the
//! key of the entry map) and one for the source file relative to the base
//! directory.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::NamingError;

/// Ordered mapping from logical key to raw target descriptor.
///
/// Iteration order is insertion order; it decides which target wins when two
/// of them resolve to the same display name.
pub type TargetList<D> = IndexMap<String, D>;

/// A resolved build unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Logical key in the target list.
    pub key: String,
    /// Display name, used as the entry map key.
    pub name: String,
    /// Source file path, relative to the base directory.
    pub path: String,
}

/// Maps raw target descriptors to display names and source paths.
///
/// Errors are opaque to the synthesizer and propagate unchanged.
pub trait TargetNaming {
    type Descriptor;
    type Error: std::error::Error;

    fn display_name(&self, key: &str, descriptor: &Self::Descriptor) -> Result<String, Self::Error>;

    fn source_path(&self, key: &str, descriptor: &Self::Descriptor) -> Result<String, Self::Error>;

    /// Resolve both attributes into a [`Target`].
    fn resolve(&self, key: &str, descriptor: &Self::Descriptor) -> Result<Target, Self::Error> {
        Ok(Target {
            key: key.to_string(),
            name: self.display_name(key, descriptor)?,
            path: self.source_path(key, descriptor)?,
        })
    }
}

/// Serverless-style function definition.
///
/// ```toml
/// [targets.createUser]
/// handler = "src/users.create"
///
/// [targets.api]
/// name = "api"
/// path = "handler.js"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl FunctionDef {
    pub fn with_path(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            handler: None,
            path: Some(path.into()),
        }
    }

    pub fn with_handler(handler: impl Into<String>) -> Self {
        Self {
            name: None,
            handler: Some(handler.into()),
            path: None,
        }
    }
}

/// Default resolver for [`FunctionDef`] targets.
///
/// - name: explicit `name`, else the logical key
/// - path: explicit `path`, else the handler's module file with the export
///   segment dropped and `source_extension` appended (`src/users.create` ->
///   `src/users.ts`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceNaming {
    source_extension: String,
}

impl Default for ServiceNaming {
    fn default() -> Self {
        Self::new("ts")
    }
}

impl ServiceNaming {
    pub fn new(source_extension: impl Into<String>) -> Self {
        let ext: String = source_extension.into();
        Self {
            source_extension: ext.trim_start_matches('.').to_string(),
        }
    }

    pub fn source_extension(&self) -> &str {
        &self.source_extension
    }
}

impl TargetNaming for ServiceNaming {
    type Descriptor = FunctionDef;
    type Error = NamingError;

    fn display_name(&self, key: &str, descriptor: &FunctionDef) -> Result<String, NamingError> {
        let name = descriptor.name.as_deref().unwrap_or(key);
        if name.trim().is_empty() {
            return Err(NamingError::EmptyName {
                key: key.to_string(),
            });
        }
        Ok(name.to_string())
    }

    fn source_path(&self, key: &str, descriptor: &FunctionDef) -> Result<String, NamingError> {
        if let Some(path) = &descriptor.path {
            return Ok(path.clone());
        }

        let handler = descriptor
            .handler
            .as_deref()
            .ok_or_else(|| NamingError::MissingHandler {
                key: key.to_string(),
            })?;

        let invalid = || NamingError::InvalidHandler {
            key: key.to_string(),
            handler: handler.to_string(),
        };

        let (module, export) = handler.rsplit_once('.').ok_or_else(invalid)?;
        if module.is_empty() || export.is_empty() || module.ends_with('/') {
            return Err(invalid());
        }

        Ok(format!("{}.{}", module, self.source_extension))
    }
}
