//! Output formatting utilities

use serde::Serialize;
use tabled::{Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed table format
    #[default]
    Table,
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Rows as a table, or a placeholder when there are none.
pub fn table<T: Tabled>(rows: Vec<T>) -> String {
    if rows.is_empty() {
        "No results".to_string()
    } else {
        Table::new(rows).to_string()
    }
}

/// `data` as YAML for [`OutputFormat::Yaml`], pretty-printed JSON otherwise.
pub fn structured<T: Serialize + ?Sized>(data: &T, format: OutputFormat) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Yaml => serde_yaml::to_string(data)?,
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(data)?,
    })
}
