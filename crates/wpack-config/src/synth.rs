//! Entry/output synthesis.
//!
//! Turns a target list plus a base configuration into the single
//! configuration handed to the bundler engine. Everything here is pure: the
//! inputs are borrowed and a fresh configuration is returned on every call.

use std::path::{Component, Path, PathBuf};

use path_clean::PathClean;
use serde_json::{Map, Value};

use crate::overlay::{BundleConfig, ENTRY_KEY, OUTPUT_KEY, OUTPUT_PATH_KEY, OutputMap};
use crate::target::{TargetList, TargetNaming};

/// Display name -> absolute source path.
pub type EntryMap = Map<String, Value>;

/// Join `relative` under `base` and normalise the result.
///
/// A leading separator on `relative` does not escape `base`:
/// `join_path("/svc", "/handler.js")` is `/svc/handler.js`.
pub fn join_path(base: &Path, relative: impl AsRef<Path>) -> PathBuf {
    let relative: PathBuf = relative
        .as_ref()
        .components()
        .filter(|c| !matches!(c, Component::RootDir | Component::Prefix(_)))
        .collect();
    base.join(relative).clean()
}

fn path_value(path: &Path) -> Value {
    Value::String(path.to_string_lossy().into_owned())
}

/// Build the entry map for `targets`.
///
/// One entry per distinct display name. When two targets share a name the
/// later one in list order wins.
pub fn create_inputs<N>(
    naming: &N,
    targets: &TargetList<N::Descriptor>,
    base_dir: &Path,
) -> Result<EntryMap, N::Error>
where
    N: TargetNaming,
{
    let mut entries = EntryMap::new();

    for (key, descriptor) in targets {
        let target = naming.resolve(key, descriptor)?;
        let source = join_path(base_dir, &target.path);

        tracing::debug!(key = %key, name = %target.name, source = %source.display(), "resolved target");

        if let Some(previous) = entries.insert(target.name.clone(), path_value(&source)) {
            tracing::debug!(
                name = %target.name,
                replaced = %previous,
                "display name collision, keeping the later target"
            );
        }
    }

    Ok(entries)
}

/// Copy `default_output` with `path` set to `output_path`.
pub fn create_output(default_output: &OutputMap, output_path: &Path) -> OutputMap {
    let mut output = default_output.clone();
    output.insert(OUTPUT_PATH_KEY.to_string(), path_value(output_path));
    output
}

/// Synthesize the bundler configuration for `targets`.
///
/// Returns `base_config` overlaid with:
/// - `entry`: [`create_inputs`] over `base_dir`
/// - `output`: [`create_output`] with `path = base_dir/folder`
///
/// Naming errors are returned as produced by `naming`.
pub fn create_configs<N>(
    naming: &N,
    targets: &TargetList<N::Descriptor>,
    base_config: &BundleConfig,
    base_dir: &Path,
    default_output: &OutputMap,
    folder: &str,
) -> Result<BundleConfig, N::Error>
where
    N: TargetNaming,
{
    let entry = create_inputs(naming, targets, base_dir)?;
    let output = create_output(default_output, &join_path(base_dir, folder));

    Ok(base_config.overlay([
        (ENTRY_KEY, Value::Object(entry)),
        (OUTPUT_KEY, Value::Object(output)),
    ]))
}
