//! Migration coordinator - main orchestrator for a run
//!
//! Reads the manifest once, converts every table it lists in discovery order,
//! then writes the load script. Any error aborts the run; the table being
//! converted at that moment leaves no CSV file behind.

use crate::config::{AppConfig, RESERVED_DELIMITERS};
use crate::core::catalog::SchemaRegistry;
use crate::core::export::load_script::{LoadScriptEmitter, LoadScriptEntry};
use crate::core::export::summary::{MigrationSummary, TableReport};
use crate::core::manifest::{Manifest, ManifestEntry};
use crate::core::transcode::{CsvFileWriter, RowTranscoder};
use crate::core::unl::UnlLineReader;
use crate::domain::{MigrationError, Result, ResultExt, TableName};
use crate::{log_error_with_context, log_table_complete, log_table_start};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Everything a table conversion needs from the manifest
struct RunContext<'a> {
    manifest: &'a Manifest,
    data_dir: PathBuf,
    output_dir: &'a Path,
    delimiter: char,
}

/// Migration coordinator
pub struct MigrationCoordinator {
    config: AppConfig,
    registry: SchemaRegistry,
}

impl MigrationCoordinator {
    /// Create a new coordinator
    pub fn new(config: AppConfig, registry: SchemaRegistry) -> Self {
        Self { config, registry }
    }

    /// Reads and parses a manifest with the configured code page
    pub fn read_manifest(&self, manifest_path: &Path) -> Result<Manifest> {
        let bytes = std::fs::read(manifest_path)
            .with_context(|| format!("Failed to read manifest {}", manifest_path.display()))?;
        Manifest::parse(self.config.source.code_page.decode(&bytes))
    }

    /// Directory holding the data files of `database`
    pub fn data_dir(&self, manifest_path: &Path, database: &str) -> PathBuf {
        let parent = manifest_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        parent.join(format!("{database}{}", self.config.source.data_dir_suffix))
    }

    /// Field delimiter for the run; the manifest's declaration wins
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ManifestFormat`] if the manifest declares a
    /// character the UNL format reserves for escapes, quotes or line ends.
    pub fn effective_delimiter(&self, manifest: &Manifest) -> Result<char> {
        let configured = self.config.source.delimiter;
        match manifest.delimiter() {
            Some(declared) if RESERVED_DELIMITERS.contains(&declared) => {
                Err(MigrationError::ManifestFormat(format!(
                    "Manifest declares reserved character {declared:?} as field delimiter"
                )))
            }
            Some(declared) if declared != configured => {
                tracing::info!(
                    configured = %configured,
                    manifest = %declared,
                    "Using delimiter declared by the manifest"
                );
                Ok(declared)
            }
            _ => Ok(configured),
        }
    }

    /// Execute the migration
    ///
    /// 1. Reads and scans the manifest
    /// 2. For each table, in manifest order:
    ///    - Recovers the declared column order
    ///    - Streams the data file through the row transcoder into a CSV file
    /// 3. Writes the load script
    pub fn run(&self, manifest_path: &Path, output_dir: &Path) -> Result<MigrationSummary> {
        let start_time = Instant::now();

        tracing::info!(manifest = %manifest_path.display(), "Starting migration");

        let manifest = self.read_manifest(manifest_path)?;
        let database = manifest.database_name()?.to_string();
        let emitter = LoadScriptEmitter::from_config(&self.config.output)?;
        let delimiter = self.effective_delimiter(&manifest)?;
        self.check_distinct_targets(manifest.entries())?;

        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Failed to create output directory {}", output_dir.display())
        })?;

        let context = RunContext {
            manifest: &manifest,
            data_dir: self.data_dir(manifest_path, &database),
            output_dir,
            delimiter,
        };

        tracing::info!(
            database = %database,
            tables = manifest.entries().len(),
            data_dir = %context.data_dir.display(),
            "Manifest scanned"
        );

        let mut summary = MigrationSummary::new(database);
        for entry in manifest.entries() {
            let report = self.convert_table(&context, entry).map_err(|e| {
                log_error_with_context!(e, format!("Converting table {}", entry.table_name_raw));
                e
            })?;
            summary.add_table(report);
        }

        let entries: Vec<LoadScriptEntry> = summary
            .tables
            .iter()
            .map(|table| LoadScriptEntry {
                csv_file_name: file_name_of(&table.csv_file),
                target_table: table.target_table.clone(),
            })
            .collect();
        let script_path = output_dir.join(&self.config.output.load_script_name);
        emitter.write(&script_path, &entries)?;
        summary.load_script = Some(script_path);

        Ok(summary.with_duration(start_time.elapsed()))
    }

    /// Output table of a manifest entry, after the catalog's schema rename
    pub fn target_table(&self, entry: &ManifestEntry) -> Result<TableName> {
        let source_name =
            TableName::new(entry.table_name_raw.as_str()).map_err(MigrationError::ManifestFormat)?;
        Ok(match &self.registry.schema_for(source_name.unqualified()).target_schema {
            Some(target_schema) => source_name.with_schema(target_schema),
            None => source_name,
        })
    }

    /// Fails when two entries would write the same CSV file
    ///
    /// Target names are compared case-insensitively, like SQL Server does.
    fn check_distinct_targets(&self, entries: &[ManifestEntry]) -> Result<()> {
        let mut seen: HashMap<String, &str> = HashMap::new();
        for entry in entries {
            let target = self.target_table(entry)?;
            let key = target.as_str().to_lowercase();
            if let Some(previous) = seen.insert(key, &entry.table_name_raw) {
                return Err(if previous == entry.table_name_raw {
                    MigrationError::ManifestFormat(format!(
                        "Table {previous} is listed more than once"
                    ))
                } else {
                    MigrationError::Configuration(format!(
                        "Tables {previous} and {} both map to {target}",
                        entry.table_name_raw
                    ))
                });
            }
        }
        Ok(())
    }

    fn convert_table(&self, context: &RunContext<'_>, entry: &ManifestEntry) -> Result<TableReport> {
        let started = Instant::now();
        let target = self.target_table(entry)?;
        let schema = self.registry.schema_for(target.unqualified());

        let declared = context.manifest.declared_columns(&entry.table_name_raw)?;
        let mut transcoder =
            RowTranscoder::new(target.as_str(), &declared, schema, context.delimiter)?;

        let data_file = context.data_dir.join(&entry.data_file_name);
        log_table_start!(target, data_file.display());

        let input = File::open(&data_file)
            .with_context(|| format!("Failed to open data file {}", data_file.display()))?;
        let reader = UnlLineReader::new(
            BufReader::new(input),
            self.config.source.code_page,
            context.delimiter,
            entry.data_file_name.clone(),
        );

        let csv_path = context.output_dir.join(format!("{target}.csv"));
        let mut writer = CsvFileWriter::create(&csv_path, self.config.output.encoding)?;

        for line in reader {
            let line = line?;
            let row = transcoder.transcode(&line, &entry.data_file_name)?;
            writer.write_row(&row)?;
        }

        let rows_written = writer.rows_written();
        let csv_file = writer.finish()?;

        if transcoder.shape_mismatches() > 0 {
            tracing::warn!(
                table = %target,
                rows = transcoder.shape_mismatches(),
                declared = declared.len(),
                "Rows with a cell count different from the declared columns"
            );
        }
        log_table_complete!(target, rows_written, csv_file.display(), started.elapsed());

        Ok(TableReport {
            target_table: target.into_inner(),
            data_file,
            csv_file,
            explicit_order: transcoder.is_explicit(),
            rows_written,
            shape_mismatches: transcoder.shape_mismatches(),
        })
    }
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
