mod json;
mod table;
mod text;

pub use json::{print_check_json, print_patch_json};
pub use table::{print_check_table, print_patch_table};
pub use text::{format_check_text, format_patch_text};

use crate::model::{CheckReport, PatchReport};
use anyhow::Result;

/// Output format for run results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per stale reference
    Text,
    /// JSON format for programmatic use
    Json,
    /// Human-readable table format
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "table" => Ok(OutputFormat::Table),
            _ => Err(format!(
                "Unknown format: {}. Use 'text', 'json' or 'table'",
                s
            )),
        }
    }
}

pub fn print_check(report: &CheckReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", format_check_text(report));
            Ok(())
        }
        OutputFormat::Json => print_check_json(report),
        OutputFormat::Table => print_check_table(report),
    }
}

pub fn print_patch(report: &PatchReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            print!("{}", format_patch_text(report));
            Ok(())
        }
        OutputFormat::Json => print_patch_json(report),
        OutputFormat::Table => print_patch_table(report),
    }
}
