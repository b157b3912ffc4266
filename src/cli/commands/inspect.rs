//! Inspect command implementation
//!
//! Shows what a conversion would do without reading any data file: the
//! tables the manifest lists, their data files, declared columns, the output
//! table name after schema renames and whether the catalog's column order can
//! be satisfied.

use crate::config::AppConfig;
use crate::core::catalog::SchemaRegistry;
use crate::core::export::MigrationCoordinator;
use crate::core::manifest::{Manifest, ManifestEntry};
use crate::core::transcode::RowTranscoder;
use crate::domain::{MigrationError, Result, TableName};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for the inspect command
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Manifest written by dbexport (`<database>.sql`)
    #[arg(short, long)]
    pub input: PathBuf,

    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// What the manifest says about one table
#[derive(Debug, Serialize)]
pub struct TableInspection {
    pub table: String,
    pub target_table: Option<String>,
    pub data_file: String,
    pub mode: &'static str,
    pub columns: Vec<String>,
    pub problem: Option<String>,
    #[serde(skip)]
    exit_code: i32,
}

/// Inspection result for a whole manifest
#[derive(Debug, Serialize)]
pub struct InspectReport {
    pub database: Option<String>,
    pub delimiter: char,
    pub data_dir: Option<PathBuf>,
    pub tables: Vec<TableInspection>,
}

impl InspectReport {
    /// Exit code of the first problem, 0 when the manifest is usable
    pub fn exit_code(&self) -> i32 {
        if self.database.is_none() {
            return 3;
        }
        self.tables
            .iter()
            .find(|t| t.problem.is_some())
            .map(|t| t.exit_code)
            .unwrap_or(0)
    }
}

impl InspectArgs {
    /// Execute the inspect command
    pub fn execute(&self, config: AppConfig) -> anyhow::Result<i32> {
        tracing::info!(input = %self.input.display(), "Inspecting manifest");

        let registry = match SchemaRegistry::from_config(&config) {
            Ok(registry) => registry,
            Err(e) => {
                eprintln!("❌ Failed to load table catalog: {e}");
                return Ok(e.exit_code());
            }
        };
        let coordinator = MigrationCoordinator::new(config, registry.clone());

        let manifest = match coordinator.read_manifest(&self.input) {
            Ok(manifest) => manifest,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        let report = match build_report(&coordinator, &registry, &manifest, &self.input) {
            Ok(report) => report,
            Err(e) => {
                eprintln!("❌ {e}");
                return Ok(e.exit_code());
            }
        };

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            print_report(&report);
        }

        Ok(report.exit_code())
    }
}

/// Collects the inspection report for a parsed manifest
///
/// Fails only if the manifest declares a reserved delimiter.
pub fn build_report(
    coordinator: &MigrationCoordinator,
    registry: &SchemaRegistry,
    manifest: &Manifest,
    manifest_path: &std::path::Path,
) -> Result<InspectReport> {
    let delimiter = coordinator.effective_delimiter(manifest)?;
    let database = manifest.database_name().ok().map(str::to_string);
    let data_dir = database
        .as_deref()
        .map(|db| coordinator.data_dir(manifest_path, db));

    let tables = manifest
        .entries()
        .iter()
        .map(|entry| inspect_table(registry, manifest, entry, delimiter))
        .collect();

    Ok(InspectReport {
        database,
        delimiter,
        data_dir,
        tables,
    })
}

fn inspect_table(
    registry: &SchemaRegistry,
    manifest: &Manifest,
    entry: &ManifestEntry,
    delimiter: char,
) -> TableInspection {
    let mut inspection = TableInspection {
        table: entry.table_name_raw.clone(),
        target_table: None,
        data_file: entry.data_file_name.clone(),
        mode: "positional",
        columns: Vec::new(),
        problem: None,
        exit_code: 0,
    };

    let outcome = TableName::new(entry.table_name_raw.as_str())
        .map_err(MigrationError::ManifestFormat)
        .and_then(|name| {
            let schema = registry.schema_for(name.unqualified());
            let target = match &schema.target_schema {
                Some(target_schema) => name.with_schema(target_schema),
                None => name,
            };
            inspection.target_table = Some(target.to_string());
            if schema.is_explicit() {
                inspection.mode = "explicit";
            }

            let declared = manifest.declared_columns(&entry.table_name_raw)?;
            inspection.columns = declared.iter().map(str::to_string).collect();
            RowTranscoder::new(target.as_str(), &declared, schema, delimiter).map(|_| ())
        });

    if let Err(e) = outcome {
        inspection.exit_code = e.exit_code();
        inspection.problem = Some(e.to_string());
    }
    inspection
}

fn print_report(report: &InspectReport) {
    match &report.database {
        Some(database) => println!("Database: {database}"),
        None => println!("❌ No database declaration found"),
    }
    println!("Delimiter: {}", report.delimiter);
    if let Some(data_dir) = &report.data_dir {
        println!("Data directory: {}", data_dir.display());
    }
    println!("Tables: {}", report.tables.len());
    println!();

    for table in &report.tables {
        let target = table.target_table.as_deref().unwrap_or("?");
        println!("{} -> {} ({}, {})", table.data_file, target, table.mode, table.table);
        if !table.columns.is_empty() {
            println!("    columns: {}", table.columns.join(", "));
        }
        if let Some(problem) = &table.problem {
            println!("    ❌ {problem}");
        }
    }
}
