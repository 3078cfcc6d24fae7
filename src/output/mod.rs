mod cli;
mod sarif;

pub use cli::{format_cli_table, print_cli_table};
pub use sarif::{generate_sarif_string, print_sarif};

use crate::model::CheckReport;
use anyhow::Result;

/// Label used for a manifest read from stdin. It names no file, so SARIF
/// results carry no location for it.
pub const STDIN_LABEL: &str = "<stdin>";

/// Output format for check reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format
    Table,
    /// JSON format for programmatic use
    Json,
    /// SARIF format for GitHub Actions code scanning
    Sarif,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "sarif" => Ok(OutputFormat::Sarif),
            _ => Err(format!(
                "Unknown format: {}. Use 'table', 'json', or 'sarif'",
                s
            )),
        }
    }
}

pub fn print_json(report: &CheckReport) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(report)?);
    Ok(())
}

/// Prints a report; `manifest` names the checked file in table and SARIF
/// output.
pub fn print_result(report: &CheckReport, format: OutputFormat, manifest: &str) -> Result<()> {
    match format {
        OutputFormat::Table => print_cli_table(report, manifest),
        OutputFormat::Json => print_json(report),
        OutputFormat::Sarif => print_sarif(report, manifest),
    }
}

/// Format report to string for file output
pub fn format_result_to_string(
    report: &CheckReport,
    format: OutputFormat,
    manifest: &str,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Sarif => generate_sarif_string(report, manifest),
        OutputFormat::Table => {
            // For table format, just use JSON as the file output
            Ok(serde_json::to_string_pretty(report)?)
        }
    }
}
