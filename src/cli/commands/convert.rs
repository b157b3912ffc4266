//! Convert command implementation
//!
//! Runs the full migration: every table of the manifest becomes a CSV file and
//! the bulk load script is written next to them.

use crate::config::AppConfig;
use crate::core::catalog::SchemaRegistry;
use crate::core::export::{MigrationCoordinator, MigrationSummary};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the convert command
#[derive(Args, Debug)]
pub struct ConvertArgs {
    /// Manifest written by dbexport (`<database>.sql`)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory for the CSV files and the load script
    #[arg(short, long)]
    pub output: PathBuf,
}

impl ConvertArgs {
    /// Execute the convert command
    pub fn execute(&self, config: AppConfig) -> anyhow::Result<i32> {
        tracing::info!(
            input = %self.input.display(),
            output = %self.output.display(),
            "Starting convert command"
        );

        let registry = match SchemaRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load table catalog");
                eprintln!("❌ Failed to load table catalog: {e}");
                return Ok(e.exit_code());
            }
        };

        let coordinator = MigrationCoordinator::new(config, registry);
        match coordinator.run(&self.input, &self.output) {
            Ok(summary) => {
                summary.log_summary();
                print_summary(&summary);
                Ok(0)
            }
            Err(e) => {
                tracing::error!(error = %e, "Migration failed");
                eprintln!("❌ Migration failed: {e}");
                Ok(e.exit_code())
            }
        }
    }
}

fn print_summary(summary: &MigrationSummary) {
    println!();
    println!("✅ Migration of database '{}' completed", summary.database);
    println!("   Tables: {}", summary.tables.len());
    println!("   Rows:   {}", summary.total_rows());
    if let Some(script) = &summary.load_script {
        println!("   Load script: {}", script.display());
    }
    let mismatches = summary.total_shape_mismatches();
    if mismatches > 0 {
        println!("⚠️  {mismatches} row(s) had a cell count different from their table declaration");
    }
    println!("   Duration: {:.2}s", summary.duration.as_secs_f64());
}
