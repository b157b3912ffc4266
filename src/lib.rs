// unl2csv - Informix UNL to CSV Migration Tool
// Copyright (c) 2025 unl2csv Contributors
// Licensed under the MIT License

//! # unl2csv - Informix UNL to CSV migration
//!
//! unl2csv converts an Informix `dbexport` directory into CSV files that SQL
//! Server can `BULK INSERT`, plus the script that loads them.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Scanning** the export manifest for the database, its tables and their data files
//! - **Recovering** each table's column order from its `create table` statement
//! - **Transcoding** UNL records (legacy code page, backslash escapes, continued lines)
//!   into fully quoted UTF-16 CSV rows
//! - **Reshaping** rows per table: explicit column order, generated defaults,
//!   date reformatting and schema renames
//! - **Emitting** the bulk load script
//!
//! ## Architecture
//!
//! unl2csv follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (UNL reading, manifest, catalog, transcoding, export)
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging and observability
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//! use unl2csv::config::load_config;
//! use unl2csv::core::catalog::SchemaRegistry;
//! use unl2csv::core::export::MigrationCoordinator;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("unl2csv.toml")?;
//!     let registry = SchemaRegistry::from_config(&config)?;
//!
//!     let coordinator = MigrationCoordinator::new(config, registry);
//!     let summary = coordinator.run(Path::new("export/orveus.sql"), Path::new("csv"))?;
//!
//!     println!("Converted {} rows", summary.total_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Row Conversion
//!
//! A single record can be converted without touching the file system:
//!
//! ```rust
//! use unl2csv::core::catalog::TableSchema;
//! use unl2csv::core::manifest::DeclaredColumns;
//! use unl2csv::core::transcode::RowTranscoder;
//! use unl2csv::core::unl::LogicalLine;
//!
//! # fn example() -> unl2csv::domain::Result<()> {
//! let declared = DeclaredColumns::new(vec!["id".into(), "name".into()]);
//! let mut transcoder = RowTranscoder::new("shop.item", &declared, &TableSchema::default(), '|')?;
//!
//! let line = LogicalLine { line_number: 1, text: "12|Jane\\|Doe|".to_string() };
//! let row = transcoder.transcode(&line, "item.unl")?;
//! assert_eq!(row.cells(), ["12", "Jane|Doe"]);
//! assert_eq!(row.to_line()?, "\"12\",\"Jane|Doe\"\n");
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! unl2csv uses the [`domain::MigrationError`] type for all errors. Every
//! error aborts the run, and each kind maps to a process exit code through
//! [`domain::MigrationError::exit_code`].
//!
//! ## Logging
//!
//! unl2csv uses structured logging with the `tracing` crate:
//!
//! ```rust,no_run
//! use tracing::{info, warn};
//!
//! info!(table = "orveus.person", rows = 42, "Table converted");
//! warn!(table = "orveus.termin", "Cell count mismatch");
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
