//! Migration summary and reporting
//!
//! This module defines structures for tracking and reporting run results.

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// Result of converting one table
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableReport {
    /// Output table name, schema rename applied
    pub target_table: String,

    /// Raw data file the rows came from
    pub data_file: PathBuf,

    /// CSV file written
    pub csv_file: PathBuf,

    /// Whether the catalog fixed the column order
    pub explicit_order: bool,

    /// Rows written to the CSV file
    pub rows_written: u64,

    /// Positional rows whose cell count differed from the declared columns
    pub shape_mismatches: u64,
}

/// Summary of a migration run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationSummary {
    /// Database named by the manifest
    pub database: String,

    /// One report per table, in manifest order
    pub tables: Vec<TableReport>,

    /// Load script written after the last table
    pub load_script: Option<PathBuf>,

    /// Duration of the run
    #[serde(skip)]
    pub duration: Duration,
}

impl MigrationSummary {
    /// Create a new empty summary
    pub fn new(database: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            tables: Vec::new(),
            load_script: None,
            duration: Duration::from_secs(0),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add a finished table
    pub fn add_table(&mut self, report: TableReport) {
        self.tables.push(report);
    }

    /// Rows written across all tables
    pub fn total_rows(&self) -> u64 {
        self.tables.iter().map(|t| t.rows_written).sum()
    }

    /// Positional shape mismatches across all tables
    pub fn total_shape_mismatches(&self) -> u64 {
        self.tables.iter().map(|t| t.shape_mismatches).sum()
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            database = %self.database,
            tables = self.tables.len(),
            total_rows = self.total_rows(),
            duration_secs = self.duration.as_secs(),
            load_script = ?self.load_script,
            "Migration completed"
        );

        for table in &self.tables {
            tracing::debug!(
                table = %table.target_table,
                rows = table.rows_written,
                csv_file = %table.csv_file.display(),
                "Table converted"
            );
        }

        let mismatches = self.total_shape_mismatches();
        if mismatches > 0 {
            tracing::warn!(
                rows = mismatches,
                "Some rows had a different cell count than their table declares"
            );
            for table in self.tables.iter().filter(|t| t.shape_mismatches > 0) {
                tracing::warn!(
                    table = %table.target_table,
                    rows = table.shape_mismatches,
                    "Cell count mismatch"
                );
            }
        }
    }
}
