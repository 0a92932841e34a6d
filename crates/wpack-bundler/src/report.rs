//! Build reports produced by [`RolldownEngine`](crate::RolldownEngine).

use std::path::PathBuf;
use std::time::Duration;

use owo_colors::OwoColorize;

use crate::diagnostics::{Diagnostic, Severity};
use crate::engine::BuildReport;
use crate::stats::StatsOptions;

/// One emitted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetStats {
    /// Path relative to the bundle's output directory.
    pub filename: String,
    pub size: usize,
    /// Chunk name for JavaScript chunks, `None` for static assets.
    pub chunk_name: Option<String>,
    pub is_entry: bool,
}

/// Outcome of building one configuration.
#[derive(Debug, Clone, Default)]
pub struct BundleStats {
    pub output_dir: PathBuf,
    /// Content hash over every emitted file (empty when nothing was emitted).
    pub hash: String,
    pub elapsed: Duration,
    pub assets: Vec<AssetStats>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl BundleStats {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn total_size(&self) -> usize {
        self.assets.iter().map(|a| a.size).sum()
    }
}

/// Aggregated report for every configuration of one invocation.
#[derive(Debug, Clone, Default)]
pub struct CompilationReport {
    pub bundles: Vec<BundleStats>,
    pub elapsed: Duration,
}

impl CompilationReport {
    pub fn new(bundles: Vec<BundleStats>, elapsed: Duration) -> Self {
        Self { bundles, elapsed }
    }

    pub fn has_warnings(&self) -> bool {
        self.bundles.iter().any(|b| !b.warnings.is_empty())
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.bundles.iter().flat_map(|b| b.errors.iter())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.bundles.iter().flat_map(|b| b.warnings.iter())
    }

    pub fn assets(&self) -> impl Iterator<Item = &AssetStats> {
        self.bundles.iter().flat_map(|b| b.assets.iter())
    }

    /// Hash of the whole invocation: the bundle hash for a single bundle,
    /// otherwise a hash over the bundle hashes.
    pub fn hash(&self) -> String {
        match self.bundles.as_slice() {
            [single] => single.hash.clone(),
            bundles => {
                let mut hasher = blake3::Hasher::new();
                for bundle in bundles {
                    hasher.update(bundle.hash.as_bytes());
                }
                short_hash(hasher.finalize())
            }
        }
    }
}

impl BuildReport for CompilationReport {
    fn has_errors(&self) -> bool {
        self.bundles.iter().any(BundleStats::has_errors)
    }

    fn render(&self, options: &StatsOptions) -> String {
        let mut lines = Vec::new();

        if let [single] = self.bundles.as_slice() {
            render_bundle(single, options, true, "", &mut lines);
            return lines.join("\n");
        }

        if options.hash {
            lines.push(format!("Hash: {}", self.hash()));
        }
        if options.version {
            lines.push(version_line());
        }
        lines.push(format!("Time: {}", format_duration(self.elapsed)));

        for bundle in &self.bundles {
            lines.push(format!(
                "Child {}:",
                paint(&bundle.output_dir.display().to_string(), Tone::Heading, options.colors)
            ));
            render_bundle(bundle, options, false, "    ", &mut lines);
        }

        lines.join("\n")
    }
}

pub(crate) fn short_hash(hash: blake3::Hash) -> String {
    hash.to_hex()[..20].to_string()
}

fn version_line() -> String {
    format!("Version: wpack {}", env!("CARGO_PKG_VERSION"))
}

fn render_bundle(
    bundle: &BundleStats,
    options: &StatsOptions,
    top_level: bool,
    indent: &str,
    lines: &mut Vec<String>,
) {
    if options.hash && !bundle.hash.is_empty() {
        lines.push(format!("{indent}Hash: {}", bundle.hash));
    }
    if options.version && top_level {
        lines.push(format!("{indent}{}", version_line()));
    }
    lines.push(format!("{indent}Time: {}", format_duration(bundle.elapsed)));

    if !bundle.assets.is_empty() {
        render_asset_table(bundle, options, indent, lines);
    }

    for warning in &bundle.warnings {
        render_diagnostic(warning, options, indent, lines);
    }
    for error in &bundle.errors {
        render_diagnostic(error, options, indent, lines);
    }
}

fn render_asset_table(bundle: &BundleStats, options: &StatsOptions, indent: &str, lines: &mut Vec<String>) {
    let mut chunk_index = 0usize;
    let rows: Vec<[String; 4]> = bundle
        .assets
        .iter()
        .map(|asset| {
            let chunk = match asset.chunk_name {
                Some(_) => {
                    let id = format!("[{chunk_index}]");
                    chunk_index += 1;
                    id
                }
                None => String::new(),
            };
            [
                asset.filename.clone(),
                format_size(asset.size),
                chunk,
                asset.chunk_name.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let header = ["Asset", "Size", "Chunks", "Chunk Names"];
    let width = |col: usize| {
        rows.iter()
            .map(|row| row[col].len())
            .chain(std::iter::once(header[col].len()))
            .max()
            .unwrap_or(0)
    };
    let (asset_w, size_w, chunk_w) = (width(0), width(1), width(2));

    let format_row = |cells: [&str; 4], asset_cell: String| {
        let mut row = format!("{indent}{}  {:>size_w$}", asset_cell, cells[1]);
        if options.chunks {
            row.push_str(&format!("  {:>chunk_w$}", cells[2]));
        }
        row.push_str(&format!("  {}", cells[3]));
        row.trim_end().to_string()
    };

    lines.push(format_row(header, format!("{:>asset_w$}", header[0])));
    for row in &rows {
        let padded = format!("{:>asset_w$}", row[0]);
        let asset_cell = paint(&padded, Tone::Asset, options.colors);
        lines.push(format_row(
            [row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()],
            asset_cell,
        ));
    }
}

fn render_diagnostic(diag: &Diagnostic, options: &StatsOptions, indent: &str, lines: &mut Vec<String>) {
    let (label, tone) = match diag.severity {
        Severity::Error => ("ERROR", Tone::Error),
        Severity::Warning => ("WARNING", Tone::Warning),
    };
    let heading = match diag.location() {
        Some(location) => format!("{label} in {location}"),
        None => format!("{label} ({})", diag.kind),
    };

    lines.push(String::new());
    lines.push(format!("{indent}{}", paint(&heading, tone, options.colors)));
    lines.push(format!("{indent}{}", diag.message));
    if let Some(help) = &diag.help {
        lines.push(format!("{indent}help: {help}"));
    }
}

#[derive(Clone, Copy)]
enum Tone {
    Asset,
    Heading,
    Error,
    Warning,
}

fn paint(text: &str, tone: Tone, colors: bool) -> String {
    if !colors {
        return text.to_string();
    }
    match tone {
        Tone::Asset => text.green().bold().to_string(),
        Tone::Heading => text.bold().to_string(),
        Tone::Error => text.red().bold().to_string(),
        Tone::Warning => text.yellow().bold().to_string(),
    }
}

/// Format file size in human-readable format.
pub fn format_size(bytes: usize) -> String {
    const UNITS: &[&str] = &["bytes", "KiB", "MiB", "GiB"];

    let mut size = bytes as f64;
    let mut unit_idx = 0;

    while size >= 1024.0 && unit_idx < UNITS.len() - 1 {
        size /= 1024.0;
        unit_idx += 1;
    }

    if unit_idx == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.2} {}", size, UNITS[unit_idx])
    }
}

fn format_duration(duration: Duration) -> String {
    let total_ms = duration.as_millis();
    if total_ms < 1000 {
        format!("{}ms", total_ms)
    } else {
        format!("{:.2}s", duration.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::DiagnosticKind;

    fn bundle(dir: &str) -> BundleStats {
        BundleStats {
            output_dir: PathBuf::from(dir),
            hash: "0123456789abcdef0123".into(),
            elapsed: Duration::from_millis(42),
            assets: vec![
                AssetStats {
                    filename: "api.js".into(),
                    size: 2048,
                    chunk_name: Some("api".into()),
                    is_entry: true,
                },
                AssetStats {
                    filename: "logo.png".into(),
                    size: 12,
                    chunk_name: None,
                    is_entry: false,
                },
            ],
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    #[test]
    fn format_size_units() {
        assert_eq!(format_size(0), "0 bytes");
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.00 KiB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MiB");
    }

    #[test]
    fn plain_render_of_single_bundle() {
        let report = CompilationReport::new(vec![bundle("/svc/.build")], Duration::from_millis(42));
        let text = report.render(&StatsOptions::plain());

        assert_eq!(
            text,
            [
                "Time: 42ms",
                "   Asset      Size  Chunk Names",
                "  api.js  2.00 KiB  api",
                "logo.png  12 bytes",
            ]
            .join("\n")
        );
        assert!(!report.has_errors());
    }

    #[test]
    fn hash_chunks_and_version_toggles() {
        let report = CompilationReport::new(vec![bundle("/svc/.build")], Duration::ZERO);
        let text = report.render(&StatsOptions::verbose().colors(false));

        assert!(text.contains("Hash: 0123456789abcdef0123"));
        assert!(text.contains(&format!("Version: wpack {}", env!("CARGO_PKG_VERSION"))));
        assert!(text.contains("Chunks"));
        assert!(text.contains("[0]"));

        let quiet = report.render(&StatsOptions::plain());
        assert!(!quiet.contains("Hash:"));
        assert!(!quiet.contains("Version:"));
        assert!(!quiet.contains("[0]"));
    }

    #[test]
    fn colors_only_when_enabled() {
        let report = CompilationReport::new(vec![bundle("/svc/.build")], Duration::ZERO);
        assert!(report.render(&StatsOptions::default()).contains('\u{1b}'));
        assert!(!report.render(&StatsOptions::plain()).contains('\u{1b}'));
    }

    #[test]
    fn errors_are_rendered_and_flagged() {
        let mut failing = bundle("/svc/.build");
        failing.assets.clear();
        failing.errors.push(Diagnostic {
            file: Some("/svc/src/a.ts".into()),
            line: Some(3),
            column: Some(9),
            ..Diagnostic::error(DiagnosticKind::ParseError, "Expected `;` but found `}`")
        });

        let report = CompilationReport::new(vec![failing], Duration::ZERO);
        let text = report.render(&StatsOptions::plain());

        assert!(report.has_errors());
        assert!(text.contains("ERROR in /svc/src/a.ts:3:9"));
        assert!(text.contains("Expected `;` but found `}`"));
    }

    #[test]
    fn multiple_bundles_render_as_children() {
        let report = CompilationReport::new(
            vec![bundle("/svc/a"), bundle("/svc/b")],
            Duration::from_millis(5),
        );
        let text = report.render(&StatsOptions::plain().hash(true));

        assert!(text.starts_with(&format!("Hash: {}", report.hash())));
        assert!(text.contains("Child /svc/a:"));
        assert!(text.contains("Child /svc/b:"));
        assert!(text.contains("    Time: 42ms"));
        assert_eq!(report.hash().len(), 20);
        assert_eq!(report.assets().count(), 4);
    }
}
