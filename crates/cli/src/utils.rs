//! Shared utilities for CLI commands.
//!
//! This module provides common functionality used across CLI commands:
//! - Error types and result handling
//! - Output formatting
//! - Input parsing helpers

use chainkit_config::ConfigError;
use chainkit_wallet::WalletError;
use clap::ValueEnum;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// CLI error types
#[derive(Error, Debug)]
pub enum CliError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// Derivation or signing pipeline failure
    #[error("{0}")]
    Wallet(#[from] WalletError),

    /// Encoding or decoding failure outside a pipeline
    #[error("{0}")]
    Encoding(#[from] chainkit_types::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// CLI result type alias
pub type CliResult<T> = Result<T, CliError>;

// ============================================================================
// Output Formatting
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for scripting
    Json,
}

/// Print a success message to stderr (so JSON output stays clean)
pub fn print_success(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[OK]").green().bold(), msg);
}

/// Print a warning message to stderr
pub fn print_warning(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[WARN]").yellow().bold(), msg);
}

/// Print an error message to stderr
pub fn print_error(msg: &str) {
    use console::style;
    eprintln!("{} {}", style("[ERROR]").red().bold(), msg);
}

/// Print `label: value` with the label padded to `width`.
pub fn print_field(label: &str, value: &str, width: usize) {
    use console::style;
    let label = format!("{:<width$}", format!("{label}:"), width = width + 1);
    println!("  {} {}", style(label).bold(), value);
}

/// Print a report as pretty JSON, or as aligned `label: value` lines.
pub fn print_report(output_format: OutputFormat, title: &str, report: &Value) -> CliResult<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(report)?);
        }
        OutputFormat::Text => {
            let rows = report_rows(report);
            let width = rows.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            println!("{}", console::style(title).bold().underlined());
            for (label, value) in rows {
                print_field(&label, &value, width);
            }
        }
    }
    Ok(())
}

fn flatten(prefix: Option<&str>, value: &Value, rows: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, inner) in map {
                let label = match prefix {
                    Some(prefix) => format!("{prefix}.{key}"),
                    None => key.clone(),
                };
                flatten(Some(&label), inner, rows);
            }
        }
        Value::String(s) => rows.push((prefix.unwrap_or_default().to_string(), s.clone())),
        Value::Null => rows.push((prefix.unwrap_or_default().to_string(), "-".to_string())),
        other => rows.push((prefix.unwrap_or_default().to_string(), other.to_string())),
    }
}

/// Flattened `(label, value)` rows of a report. Nested objects get dotted
/// labels.
pub fn report_rows(report: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    flatten(None, report, &mut rows);
    rows
}

// ============================================================================
// Input Parsing
// ============================================================================

/// `0x`-prefixed lowercase hex.
pub fn hex0x(bytes: impl AsRef<[u8]>) -> String {
    format!("0x{}", hex::encode(bytes))
}

/// Read a file to a string, reporting a missing file by name.
pub fn read_file(path: &std::path::Path) -> CliResult<String> {
    if !path.exists() {
        return Err(CliError::FileNotFound(path.display().to_string()));
    }
    Ok(std::fs::read_to_string(path)?)
}
