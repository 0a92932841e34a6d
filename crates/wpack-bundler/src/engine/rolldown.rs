//! [`BundlerEngine`] backed by Rolldown.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ::rolldown::{
    BundlerBuilder, BundlerOptions, InputItem, IsExternal, OutputFormat, Platform, SourceMapType,
};
use anyhow::{Context, anyhow, bail};
use async_trait::async_trait;
use rolldown_common::Output;
use serde_json::Value;
use wpack_config::{BundleConfig, ENTRY_KEY, OUTPUT_PATH_KEY};

use super::{BundlerEngine, ConfigSet, EngineError};
use crate::diagnostics::{self, Severity};
use crate::output::{EmittedFile, write_files};
use crate::report::{AssetStats, BundleStats, CompilationReport, short_hash};

/// Compiles each configuration with Rolldown and writes the result under its
/// `output.path`.
///
/// Recognised configuration keys:
///
/// | key | type | |
/// |---|---|---|
/// | `entry` | object of name -> path | required |
/// | `output.path` | string | required |
/// | `output.format` | `esm`, `cjs`, `commonjs`, `commonjs2`, `iife` | default `esm` |
/// | `output.filename` | template with `[name]` / `[hash]` | default `[name].js` |
/// | `platform` | `node`, `browser`, `neutral` | default `node` |
/// | `external` / `externals` | array of strings | |
/// | `sourcemap` / `devtool` | truthy | external `.map` files |
/// | `context` | string | resolution root |
///
/// Other keys are ignored.
#[derive(Debug, Clone, Default)]
pub struct RolldownEngine {
    cwd: Option<PathBuf>,
}

impl RolldownEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution root used when a configuration has no `context`.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }
}

#[async_trait]
impl BundlerEngine for RolldownEngine {
    type Report = CompilationReport;

    async fn compile(&self, configs: ConfigSet) -> Result<CompilationReport, EngineError> {
        let started = Instant::now();
        let multiple = configs.len() > 1;

        // Every configuration is checked before anything is built.
        let plans = configs
            .configs()
            .iter()
            .enumerate()
            .map(|(index, config)| {
                BundlePlan::from_config(config, self.cwd.as_deref()).with_context(|| {
                    if multiple {
                        format!("invalid configuration #{index}")
                    } else {
                        "invalid configuration".to_string()
                    }
                })
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let mut bundles = Vec::with_capacity(plans.len());
        for plan in plans {
            bundles.push(build_bundle(plan).await?);
        }

        Ok(CompilationReport::new(bundles, started.elapsed()))
    }
}

/// Rolldown options derived from one configuration.
struct BundlePlan {
    output_dir: PathBuf,
    options: BundlerOptions,
}

impl BundlePlan {
    fn from_config(config: &BundleConfig, default_cwd: Option<&Path>) -> anyhow::Result<Self> {
        let entry = config
            .entry()
            .ok_or_else(|| anyhow!("`{ENTRY_KEY}` must be an object of name -> source path"))?;
        if entry.is_empty() {
            bail!("`{ENTRY_KEY}` has no targets");
        }

        let input = entry
            .iter()
            .map(|(name, path)| match path.as_str() {
                Some(import) => Ok(InputItem {
                    name: Some(name.clone()),
                    import: import.to_string(),
                }),
                None => Err(anyhow!("`{ENTRY_KEY}.{name}` must be a string path")),
            })
            .collect::<anyhow::Result<Vec<_>>>()?;

        let output_dir = config
            .output_path()
            .map(PathBuf::from)
            .ok_or_else(|| anyhow!("`output.{OUTPUT_PATH_KEY}` must be a string"))?;

        let format = match config.output().and_then(|output| output.get("format")) {
            None => OutputFormat::Esm,
            Some(value) => parse_format(value)?,
        };

        let entry_filenames = match config.output().and_then(|output| output.get("filename")) {
            None => None,
            Some(value) => Some(parse_filename(value)?),
        };

        let platform = match config.get("platform") {
            None => Platform::Node,
            Some(value) => parse_platform(value)?,
        };

        let external = match config.get("external").or_else(|| config.get("externals")) {
            None => None,
            Some(value) => Some(IsExternal::from(parse_string_list(value, "external")?)),
        };

        let sourcemap = config
            .get("sourcemap")
            .or_else(|| config.get("devtool"))
            .filter(|value| is_truthy(value))
            .map(|_| SourceMapType::File);

        let cwd = match config.get("context") {
            None => default_cwd.map(Path::to_path_buf),
            Some(Value::String(context)) => Some(PathBuf::from(context)),
            Some(_) => bail!("`context` must be a string path"),
        };

        let options = BundlerOptions {
            input: Some(input),
            cwd,
            format: Some(format),
            entry_filenames: entry_filenames.map(Into::into),
            platform: Some(platform),
            external,
            sourcemap,
            ..Default::default()
        };

        Ok(Self {
            output_dir,
            options,
        })
    }
}

fn parse_format(value: &Value) -> anyhow::Result<OutputFormat> {
    match value.as_str() {
        Some("esm" | "module") => Ok(OutputFormat::Esm),
        Some("cjs" | "commonjs" | "commonjs2") => Ok(OutputFormat::Cjs),
        Some("iife") => Ok(OutputFormat::Iife),
        _ => bail!("unsupported `output.format` {value}, expected esm, cjs or iife"),
    }
}

/// Filename template for entry chunks. Webpack-only placeholders are rejected
/// instead of being written out literally.
fn parse_filename(value: &Value) -> anyhow::Result<String> {
    const UNSUPPORTED: [&str; 3] = ["[id]", "[chunkhash", "[contenthash"];

    let template = value
        .as_str()
        .filter(|template| !template.trim().is_empty())
        .ok_or_else(|| anyhow!("`output.filename` must be a non-empty string"))?;

    if let Some(placeholder) = UNSUPPORTED.iter().find(|p| template.contains(*p)) {
        bail!("unsupported placeholder `{placeholder}` in `output.filename` \"{template}\", use [name] or [hash]");
    }
    if Path::new(template).is_absolute() {
        bail!("`output.filename` \"{template}\" must be relative to `output.path`");
    }

    Ok(template.to_string())
}

fn parse_platform(value: &Value) -> anyhow::Result<Platform> {
    match value.as_str() {
        Some("node") => Ok(Platform::Node),
        Some("browser") => Ok(Platform::Browser),
        Some("neutral") => Ok(Platform::Neutral),
        _ => bail!("unsupported `platform` {value}, expected node, browser or neutral"),
    }
}

fn parse_string_list(value: &Value, key: &str) -> anyhow::Result<Vec<String>> {
    match value {
        Value::String(single) => Ok(vec![single.clone()]),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| anyhow!("`{key}` entries must be strings"))
            })
            .collect(),
        _ => bail!("`{key}` must be a string or an array of strings"),
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::String(text) => !text.is_empty() && text != "false",
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

async fn build_bundle(plan: BundlePlan) -> Result<BundleStats, EngineError> {
    let started = Instant::now();
    let BundlePlan {
        output_dir,
        options,
    } = plan;

    tracing::debug!(output = %output_dir.display(), "building bundle");

    let mut bundler = BundlerBuilder::default()
        .with_options(options)
        .build()
        .map_err(|e| anyhow!("failed to create bundler: {e:?}"))?;

    let bundle = match bundler.generate().await {
        Ok(bundle) => bundle,
        Err(errors) => {
            let errors = diagnostics::extract(&errors, Severity::Error);
            tracing::debug!(errors = errors.len(), output = %output_dir.display(), "bundle failed");
            return Ok(BundleStats {
                output_dir,
                elapsed: started.elapsed(),
                errors,
                ..Default::default()
            });
        }
    };

    let warnings = bundle
        .warnings
        .iter()
        .flat_map(|warning| diagnostics::extract(warning, Severity::Warning))
        .collect();

    let mut hasher = blake3::Hasher::new();
    let mut assets = Vec::with_capacity(bundle.assets.len());
    let mut files = Vec::with_capacity(bundle.assets.len());

    for output in &bundle.assets {
        let (filename, contents, chunk_name, is_entry) = match output {
            Output::Chunk(chunk) => (
                chunk.filename.as_str(),
                chunk.code.as_bytes(),
                Some(chunk.name.to_string()),
                chunk.is_entry,
            ),
            Output::Asset(asset) => (asset.filename.as_str(), asset.source.as_bytes(), None, false),
        };

        hasher.update(filename.as_bytes());
        hasher.update(contents);
        assets.push(AssetStats {
            filename: filename.to_string(),
            size: contents.len(),
            chunk_name,
            is_entry,
        });
        files.push(EmittedFile { filename, contents });
    }

    write_files(&output_dir, &files)
        .await
        .with_context(|| format!("failed to write bundle to '{}'", output_dir.display()))?;

    let hash = if assets.is_empty() {
        String::new()
    } else {
        short_hash(hasher.finalize())
    };

    tracing::debug!(assets = assets.len(), output = %output_dir.display(), "bundle written");

    Ok(BundleStats {
        output_dir,
        hash,
        elapsed: started.elapsed(),
        assets,
        errors: Vec::new(),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> BundleConfig {
        BundleConfig::from_value(value).unwrap()
    }

    #[test]
    fn plan_reads_entry_and_output() {
        let plan = BundlePlan::from_config(
            &config(json!({
                "entry": {"api": "/svc/api.ts", "jobs": "/svc/jobs.ts"},
                "output": {"path": "/svc/.wpack", "format": "commonjs2"},
                "externals": ["aws-sdk"],
                "devtool": "source-map",
                "context": "/svc"
            })),
            None,
        )
        .unwrap();

        assert_eq!(plan.output_dir, PathBuf::from("/svc/.wpack"));
        let input = plan.options.input.as_ref().unwrap();
        assert_eq!(input.len(), 2);
        assert_eq!(input[0].name.as_deref(), Some("api"));
        assert_eq!(input[0].import, "/svc/api.ts");
        assert!(matches!(plan.options.format, Some(OutputFormat::Cjs)));
        assert!(matches!(plan.options.platform, Some(Platform::Node)));
        assert!(matches!(plan.options.sourcemap, Some(SourceMapType::File)));
        assert!(plan.options.external.is_some());
        assert_eq!(plan.options.cwd, Some(PathBuf::from("/svc")));
    }

    #[test]
    fn filename_template_becomes_entry_filenames() {
        let plan = BundlePlan::from_config(
            &config(json!({
                "entry": {"api": "/svc/api.ts"},
                "output": {"path": "/out", "filename": "[name].bundle.js"}
            })),
            None,
        )
        .unwrap();
        assert!(plan.options.entry_filenames.is_some());

        let plan = BundlePlan::from_config(
            &config(json!({"entry": {"api": "/svc/api.ts"}, "output": {"path": "/out"}})),
            None,
        )
        .unwrap();
        assert!(plan.options.entry_filenames.is_none());
    }

    #[test]
    fn unsupported_filename_templates_are_rejected() {
        for filename in [json!("[name].[contenthash].js"), json!("[id].js"), json!(""), json!(3)] {
            let result = BundlePlan::from_config(
                &config(json!({
                    "entry": {"api": "/svc/api.ts"},
                    "output": {"path": "/out", "filename": filename.clone()}
                })),
                None,
            );
            assert!(result.is_err(), "accepted {filename}");
        }
    }

    #[test]
    fn default_cwd_applies_without_context() {
        let plan = BundlePlan::from_config(
            &config(json!({"entry": {"a": "a.ts"}, "output": {"path": "/out"}})),
            Some(Path::new("/project")),
        )
        .unwrap();
        assert_eq!(plan.options.cwd, Some(PathBuf::from("/project")));
        assert!(matches!(plan.options.format, Some(OutputFormat::Esm)));
        assert!(plan.options.sourcemap.is_none());
    }

    #[test]
    fn missing_or_invalid_keys_are_rejected() {
        let cases = [
            json!({"output": {"path": "/out"}}),
            json!({"entry": {}, "output": {"path": "/out"}}),
            json!({"entry": {"a": 1}, "output": {"path": "/out"}}),
            json!({"entry": {"a": "a.ts"}}),
            json!({"entry": {"a": "a.ts"}, "output": {"path": "/out", "format": "amd"}}),
            json!({"entry": {"a": "a.ts"}, "output": {"path": "/out"}, "platform": "deno"}),
            json!({"entry": {"a": "a.ts"}, "output": {"path": "/out"}, "external": [1]}),
        ];

        for case in cases {
            assert!(
                BundlePlan::from_config(&config(case.clone()), None).is_err(),
                "accepted {case}"
            );
        }
    }

    #[test]
    fn truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("source-map")));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("false")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
    }
}
