//! Generic bundler configuration and the overlay operation.
//!
//! The bundler's schema is not ours to model, so a configuration is kept as
//! an ordered JSON object. Everything the synthesizer derives is applied with
//! [`BundleConfig::overlay`]: keys named by the overlay replace the base value
//! wholesale, every other key passes through untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Top-level key holding the entry map.
pub const ENTRY_KEY: &str = "entry";
/// Top-level key holding the output descriptor.
pub const OUTPUT_KEY: &str = "output";
/// Output descriptor key holding the output directory.
pub const OUTPUT_PATH_KEY: &str = "path";

/// Opaque output descriptor (`filename`, `format`, `path`, ...).
pub type OutputMap = Map<String, Value>;

/// An engine-agnostic bundler configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BundleConfig(Map<String, Value>);

impl BundleConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow merge: returns a copy of `self` where every key in `fields`
    /// is replaced by the given value. `self` is left as is.
    ///
    /// ```
    /// use serde_json::json;
    /// use wpack_config::BundleConfig;
    ///
    /// let base = BundleConfig::from_value(json!({"mode": "production", "entry": "./a.js"})).unwrap();
    /// let merged = base.overlay([("entry", json!({"a": "/src/a.js"}))]);
    ///
    /// assert_eq!(merged.get("mode"), Some(&json!("production")));
    /// assert_eq!(merged.get("entry"), Some(&json!({"a": "/src/a.js"})));
    /// assert_eq!(base.get("entry"), Some(&json!("./a.js")));
    /// ```
    pub fn overlay<K, I>(&self, fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut merged = self.0.clone();
        for (key, value) in fields {
            merged.insert(key.into(), value);
        }
        Self(merged)
    }

    /// Build from a JSON value. Returns `None` unless the value is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The entry map, if present and shaped as an object.
    pub fn entry(&self) -> Option<&Map<String, Value>> {
        self.0.get(ENTRY_KEY).and_then(Value::as_object)
    }

    /// The output descriptor, if present and shaped as an object.
    pub fn output(&self) -> Option<&OutputMap> {
        self.0.get(OUTPUT_KEY).and_then(Value::as_object)
    }

    /// `output.path` as a string.
    pub fn output_path(&self) -> Option<&str> {
        self.output()
            .and_then(|output| output.get(OUTPUT_PATH_KEY))
            .and_then(Value::as_str)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

impl From<Map<String, Value>> for BundleConfig {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<BundleConfig> for Value {
    fn from(config: BundleConfig) -> Self {
        config.into_value()
    }
}
