//! Diagnostic extraction from Rolldown errors and warnings.
//!
//! Rolldown's diagnostic types are not a stable public surface, so they are
//! read through their `Debug` representation and reduced to a small,
//! cloneable [`Diagnostic`].

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: String,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub column: Option<u32>,
    pub help: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    ParseError,
    UnresolvedEntry,
    UnresolvedImport,
    MissingExport,
    CircularDependency,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DiagnosticKind::ParseError => "ParseError",
            DiagnosticKind::UnresolvedEntry => "UnresolvedEntry",
            DiagnosticKind::UnresolvedImport => "UnresolvedImport",
            DiagnosticKind::MissingExport => "MissingExport",
            DiagnosticKind::CircularDependency => "CircularDependency",
            DiagnosticKind::Other => "Error",
        };
        f.write_str(name)
    }
}

impl Diagnostic {
    /// Diagnostic with only a message, used for failures raised outside Rolldown.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: Severity::Error,
            message: message.into(),
            file: None,
            line: None,
            column: None,
            help: None,
        }
    }

    /// `file:line:column` when known.
    pub fn location(&self) -> Option<String> {
        let file = self.file.as_ref()?;
        Some(match (self.line, self.column) {
            (Some(line), Some(column)) => format!("{file}:{line}:{column}"),
            (Some(line), None) => format!("{file}:{line}"),
            _ => file.clone(),
        })
    }
}

/// Extract diagnostics from a Rolldown error or warning batch.
pub fn extract(source: &dyn std::fmt::Debug, severity: Severity) -> Vec<Diagnostic> {
    let text = format!("{source:?}");
    let parts: Vec<&str> = text
        .split("BatchedBuildDiagnostic")
        .map(str::trim)
        .filter(|part| !part.is_empty() && *part != "(" && *part != ")")
        .collect();

    if parts.len() > 1 {
        parts
            .into_iter()
            .map(|part| extract_single(part, severity))
            .collect()
    } else {
        vec![extract_single(&text, severity)]
    }
}

fn extract_single(text: &str, severity: Severity) -> Diagnostic {
    let file = extract_file_path(text);
    let (line, column) = extract_line_column(text);

    Diagnostic {
        kind: classify(text),
        severity,
        message: first_meaningful_line(text),
        file,
        line,
        column,
        help: extract_help_text(text),
    }
}

fn classify(text: &str) -> DiagnosticKind {
    if text.contains("UnresolvedEntry") || text.contains("Cannot resolve entry") {
        DiagnosticKind::UnresolvedEntry
    } else if text.contains("UnresolvedImport") || text.contains("Could not resolve") {
        DiagnosticKind::UnresolvedImport
    } else if text.contains("MissingExport") {
        DiagnosticKind::MissingExport
    } else if text.contains("CircularDependency") || text.contains("Circular") {
        DiagnosticKind::CircularDependency
    } else if text.contains("ParseError")
        || text.contains("Parse error")
        || text.contains("Syntax")
        || text.contains("Expected")
    {
        DiagnosticKind::ParseError
    } else {
        DiagnosticKind::Other
    }
}

fn first_meaningful_line(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("unknown bundler error")
        .to_string()
}

/// Look for a source path ending in a script extension.
fn extract_file_path(text: &str) -> Option<String> {
    for ext in [".tsx", ".ts", ".jsx", ".mjs", ".cjs", ".js"] {
        let Some(pos) = text.find(ext) else {
            continue;
        };
        let before = &text[..pos + ext.len()];
        let start = before
            .rfind(|c: char| c.is_whitespace() || matches!(c, '"' | '\'' | '`' | '(' | '['))
            .map(|i| i + 1)
            .unwrap_or(0);
        let path = before[start..].trim();
        if !path.is_empty() {
            return Some(path.to_string());
        }
    }
    None
}

/// `line N` / `column N`, or `:N:M` after a path.
fn extract_line_column(text: &str) -> (Option<u32>, Option<u32>) {
    let number_after = |pattern: &str| -> Option<u32> {
        let pos = text.find(pattern)?;
        let digits: String = text[pos + pattern.len()..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse().ok()
    };

    let line = number_after("line ");
    let column = number_after("column ");
    if line.is_some() {
        return (line, column);
    }

    for (idx, _) in text.match_indices(':') {
        let rest = &text[idx + 1..];
        let line_digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
        if line_digits.is_empty() {
            continue;
        }
        let after_line = &rest[line_digits.len()..];
        let column = after_line.strip_prefix(':').and_then(|tail| {
            let digits: String = tail.chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse().ok()
        });
        return (line_digits.parse().ok(), column);
    }

    (None, None)
}

fn extract_help_text(text: &str) -> Option<String> {
    for indicator in ["help: ", "Help: ", "hint: ", "Hint: "] {
        if let Some(pos) = text.find(indicator) {
            let help = text[pos + indicator.len()..].lines().next().unwrap_or("").trim();
            if !help.is_empty() {
                return Some(help.to_string());
            }
        }
    }
    None
}
