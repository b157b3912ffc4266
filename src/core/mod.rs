//! Core business logic for unl2csv.
//!
//! # Modules
//!
//! - [`unl`] - Reading UNL data files: code pages, line continuations, cell splitting
//! - [`manifest`] - dbexport manifest scanning and declared column recovery
//! - [`catalog`] - Per-table rules: column order, formatters, defaults, schema renames
//! - [`transcode`] - Record to CSV row conversion and UTF-16 file output
//! - [`export`] - Run orchestration, load script generation and reporting
//!
//! # Migration Workflow
//!
//! 1. **Scan**: Read the manifest, find the database and every table with its data file
//! 2. **Declare**: Recover each table's column order from its `create table` clause
//! 3. **Transcode**: Stream the data file row by row into a quoted CSV file
//! 4. **Script**: Write one `BULK INSERT` per CSV file plus the post-load SQL
//! 5. **Report**: Log the run summary
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use unl2csv::config::AppConfig;
//! use unl2csv::core::catalog::SchemaRegistry;
//! use unl2csv::core::export::MigrationCoordinator;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let registry = SchemaRegistry::from_config(&config)?;
//! let coordinator = MigrationCoordinator::new(config, registry);
//!
//! let summary = coordinator.run(Path::new("export/orveus.sql"), Path::new("csv"))?;
//! println!("Tables: {}", summary.tables.len());
//! println!("Rows: {}", summary.total_rows());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod export;
pub mod manifest;
pub mod transcode;
pub mod unl;
