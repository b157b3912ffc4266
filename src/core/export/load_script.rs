//! Bulk load script generation
//!
//! The script has one `BULK INSERT` statement per CSV file, in conversion
//! order, followed by the post-load SQL that re-enables constraints and
//! backfills rows the legacy database never had.

use crate::config::OutputConfig;
use crate::domain::{Result, ResultExt};
use std::path::Path;

/// Post-load SQL shipped with the binary
pub const DEFAULT_POST_LOAD_SQL: &str = include_str!("../../../templates/post_load.mssql.sql");

/// One CSV file to be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadScriptEntry {
    /// File name of the CSV, relative to the bulk load directory
    pub csv_file_name: String,

    /// Table the file is loaded into
    pub target_table: String,
}

/// Writes the bulk load script
#[derive(Debug, Clone)]
pub struct LoadScriptEmitter {
    bulk_load_dir: String,
    post_load_sql: String,
}

impl LoadScriptEmitter {
    /// Creates an emitter; a missing trailing separator on `bulk_load_dir` is added
    pub fn new(bulk_load_dir: impl Into<String>, post_load_sql: impl Into<String>) -> Self {
        let mut bulk_load_dir = bulk_load_dir.into();
        if !bulk_load_dir.ends_with(['/', '\\']) {
            bulk_load_dir.push('/');
        }
        Self {
            bulk_load_dir,
            post_load_sql: post_load_sql.into(),
        }
    }

    /// Emitter for the configured output, reading a custom post-load template if set
    pub fn from_config(config: &OutputConfig) -> Result<Self> {
        let post_load_sql = match &config.post_load_template {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read post-load template {path}"))?,
            None => DEFAULT_POST_LOAD_SQL.to_string(),
        };
        Ok(Self::new(config.bulk_load_dir.clone(), post_load_sql))
    }

    /// Load statement for one CSV file
    pub fn bulk_insert_statement(&self, entry: &LoadScriptEntry) -> String {
        format!(
            "BULK INSERT {}\n FROM '{}{}'\n WITH (FORMAT = \"CSV\", ROWTERMINATOR = \"\\n\", KEEPIDENTITY);\n\n",
            entry.target_table, self.bulk_load_dir, entry.csv_file_name
        )
    }

    /// Full script text
    pub fn render(&self, entries: &[LoadScriptEntry]) -> String {
        let mut script = String::new();
        for entry in entries {
            script.push_str(&self.bulk_insert_statement(entry));
        }
        script.push_str(&self.post_load_sql);
        script
    }

    /// Writes the script as UTF-8
    pub fn write(&self, path: impl AsRef<Path>, entries: &[LoadScriptEntry]) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.render(entries))
            .with_context(|| format!("Failed to write load script {}", path.display()))?;
        tracing::info!(
            file = %path.display(),
            statements = entries.len(),
            "Load script written"
        );
        Ok(())
    }
}
