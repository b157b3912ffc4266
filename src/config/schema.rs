//! Configuration schema types
//!
//! This module defines the configuration structure for unl2csv. Every section
//! is optional; a run with no configuration file uses the defaults below.

use crate::core::catalog::TableSchema;
use crate::core::unl::CodePage;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Byte order of the UTF-16 CSV output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputEncoding {
    /// UTF-16 big endian with byte order mark
    #[default]
    #[serde(rename = "utf-16be")]
    Utf16Be,
    /// UTF-16 little endian with byte order mark
    #[serde(rename = "utf-16le")]
    Utf16Le,
}

/// Main unl2csv configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// How raw UNL data files are read
    #[serde(default)]
    pub source: SourceConfig,

    /// CSV and load script output settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// External table catalog file
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Inline table catalog entries, keyed by unqualified table name
    #[serde(default)]
    pub tables: BTreeMap<String, TableSchema>,
}

impl AppConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.source.validate()?;
        self.output.validate()?;
        self.logging.validate()?;
        for (name, table) in &self.tables {
            table
                .validate()
                .map_err(|e| format!("tables.{name}: {e}"))?;
        }
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Source (UNL data file) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Legacy code page the export was written in
    #[serde(default)]
    pub code_page: CodePage,

    /// Field delimiter of the UNL files
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Suffix of the directory holding the data files, appended to the database name
    #[serde(default = "default_data_dir_suffix")]
    pub data_dir_suffix: String,
}

/// Characters the UNL format gives a meaning of their own
pub const RESERVED_DELIMITERS: [char; 4] = ['\\', '"', '\n', '\r'];

impl SourceConfig {
    fn validate(&self) -> Result<(), String> {
        if RESERVED_DELIMITERS.contains(&self.delimiter) {
            return Err(format!(
                "source.delimiter {:?} is reserved and cannot be used as field delimiter",
                self.delimiter
            ));
        }
        Ok(())
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            code_page: CodePage::default(),
            delimiter: default_delimiter(),
            data_dir_suffix: default_data_dir_suffix(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Encoding of the produced CSV files
    #[serde(default)]
    pub encoding: OutputEncoding,

    /// File name of the generated bulk load script
    #[serde(default = "default_load_script_name")]
    pub load_script_name: String,

    /// Directory the database server reads the CSV files from
    #[serde(default = "default_bulk_load_dir")]
    pub bulk_load_dir: String,

    /// Optional replacement for the built-in post-load script
    #[serde(default)]
    pub post_load_template: Option<String>,
}

impl OutputConfig {
    fn validate(&self) -> Result<(), String> {
        if self.load_script_name.trim().is_empty() {
            return Err("output.load_script_name cannot be empty".to_string());
        }
        if self.load_script_name.contains(['/', '\\']) {
            return Err(format!(
                "output.load_script_name must be a plain file name, got '{}'",
                self.load_script_name
            ));
        }
        if self.bulk_load_dir.is_empty() {
            return Err("output.bulk_load_dir cannot be empty".to_string());
        }
        Ok(())
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            encoding: OutputEncoding::default(),
            load_script_name: default_load_script_name(),
            bulk_load_dir: default_bulk_load_dir(),
            post_load_template: None,
        }
    }
}

/// Catalog file configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Path of a TOML file with `[tables.<name>]` entries
    #[serde(default)]
    pub path: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local_enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_delimiter() -> char {
    '|'
}

fn default_data_dir_suffix() -> String {
    ".exp".to_string()
}

fn default_load_script_name() -> String {
    "import.mssql.sql".to_string()
}

fn default_bulk_load_dir() -> String {
    "/var/opt/mssql/backups/init/".to_string()
}

fn default_local_path() -> String {
    "logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::DefaultValue;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.application.log_level, "info");
        assert_eq!(config.source.code_page, CodePage::Cp850);
        assert_eq!(config.source.delimiter, '|');
        assert_eq!(config.source.data_dir_suffix, ".exp");
        assert_eq!(config.output.encoding, OutputEncoding::Utf16Be);
        assert_eq!(config.output.load_script_name, "import.mssql.sql");
        assert_eq!(config.output.bulk_load_dir, "/var/opt/mssql/backups/init/");
        assert!(config.output.post_load_template.is_none());
        assert!(!config.logging.local_enabled);
        assert!(config.catalog.path.is_none());
        assert!(config.tables.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config_parses() {
        let toml_content = r#"
[application]
log_level = "debug"

[source]
code_page = "cp437"
delimiter = ";"
data_dir_suffix = ".export"

[output]
encoding = "utf-16le"
load_script_name = "load.sql"
bulk_load_dir = "/data/init/"

[tables.person]
column_order = ["pe_id", "deleted"]
defaults = { deleted = { constant = "0" } }
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.source.code_page, CodePage::Cp437);
        assert_eq!(config.source.delimiter, ';');
        assert_eq!(config.output.encoding, OutputEncoding::Utf16Le);
        let person = &config.tables["person"];
        assert_eq!(
            person.default_for("deleted"),
            Some(&DefaultValue::Constant("0".to_string()))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = AppConfig::default();
        config.application.log_level = "verbose".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("Invalid log_level"));
    }

    #[test]
    fn test_reserved_delimiter_rejected() {
        let mut config = AppConfig::default();
        config.source.delimiter = '\\';
        assert!(config.validate().is_err());
        config.source.delimiter = '"';
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_script_name_must_be_plain() {
        let mut config = AppConfig::default();
        config.output.load_script_name = "../import.sql".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rotation() {
        let mut config = AppConfig::default();
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_table_entry_reported_with_name() {
        let toml_content = r#"
[tables.salaergruppe]
column_order = ["sg_id", "sg_id"]
"#;
        let config: AppConfig = toml::from_str(toml_content).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.starts_with("tables.salaergruppe"));
    }
}
