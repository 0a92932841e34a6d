//! # wpack-config
//!
//! Derives a bundler configuration from a list of named build targets.
//!
//! The central entry point is [`create_configs`]: given a target list, a
//! naming resolver, a base configuration, a base directory, a default output
//! descriptor and an output folder name, it returns the base configuration
//! overlaid with a synthesized `entry` map and `output` descriptor.
//!
//! ```
//! use std::path::Path;
//! use serde_json::json;
//! use wpack_config::{BundleConfig, FunctionDef, OutputMap, ServiceNaming, TargetList, create_configs};
//!
//! let mut targets = TargetList::new();
//! targets.insert("api".to_string(), FunctionDef::with_path("api", "handler.js"));
//!
//! let config = create_configs(
//!     &ServiceNaming::default(),
//!     &targets,
//!     &BundleConfig::new(),
//!     Path::new("/svc"),
//!     &OutputMap::new(),
//!     ".build",
//! )
//! .unwrap();
//!
//! assert_eq!(config.get("entry"), Some(&json!({"api": "/svc/handler.js"})));
//! assert_eq!(config.output_path(), Some("/svc/.build"));
//! ```

pub mod discovery;
pub mod error;
pub mod overlay;
pub mod project;
pub mod synth;
pub mod target;

pub use discovery::{ProjectDiscovery, apply_env_overrides, discover};
pub use error::*;
pub use overlay::{BundleConfig, ENTRY_KEY, OUTPUT_KEY, OUTPUT_PATH_KEY, OutputMap};
pub use project::{ProjectConfig, ProjectSettings, StatsSettings};
pub use synth::{EntryMap, create_configs, create_inputs, create_output, join_path};
pub use target::{FunctionDef, ServiceNaming, Target, TargetList, TargetNaming};
