//! Configuration management for unl2csv.
//!
//! # Overview
//!
//! unl2csv uses an optional TOML configuration file with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `UNL2CSV_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - An inline or external table catalog
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [source]
//! code_page = "cp850"
//! delimiter = "|"
//!
//! [output]
//! encoding = "utf-16be"
//! bulk_load_dir = "/var/opt/mssql/backups/init/"
//!
//! [catalog]
//! path = "catalogs/orveus.toml"
//!
//! [tables.person]
//! defaults = { deleted = { constant = "" } }
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unl2csv::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("unl2csv.toml")?;
//! println!("Reading {:?} with delimiter {}", config.source.code_page, config.source.delimiter);
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{default_config, load_config};
pub use schema::{
    AppConfig, ApplicationConfig, CatalogConfig, LoggingConfig, OutputConfig, OutputEncoding,
    SourceConfig, RESERVED_DELIMITERS,
};
