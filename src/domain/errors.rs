//! Domain error types
//!
//! This module defines the error hierarchy for unl2csv. Every failure aborts
//! the current run: a bulk load is only correct when every produced file is
//! structurally complete, so no variant is recovered from row by row.

use thiserror::Error;

/// Main unl2csv error type
#[derive(Debug, Error)]
pub enum MigrationError {
    /// A required manifest clause is missing or malformed
    #[error("Manifest format error: {0}")]
    ManifestFormat(String),

    /// Explicit column order names a column the export neither declares nor defaults
    #[error("Column '{column}' of table '{table}' is neither declared by the export nor defaulted")]
    UndeclaredColumn { table: String, column: String },

    /// A line continuation was still pending when the data file ended
    #[error("Truncated record in {file}: continuation started at line {line} never completed")]
    TruncatedRecord { file: String, line: usize },

    /// A record has fewer cells than the declared column layout requires
    #[error("Malformed record in {file} at line {line}: needs cell index {expected} but only {found} cells present")]
    MalformedRecord {
        file: String,
        line: usize,
        expected: usize,
        found: usize,
    },

    /// A formatter could not parse a non-blank value
    #[error("Cannot format value '{value}' of column '{column}': {reason}")]
    CellFormat {
        column: String,
        value: String,
        reason: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),
}

impl MigrationError {
    /// Process exit code the CLI reports for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            MigrationError::Configuration(_) => 2,
            MigrationError::ManifestFormat(_) => 3,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for MigrationError {
    fn from(err: std::io::Error) -> Self {
        MigrationError::Io(err.to_string())
    }
}

// Conversion from CSV writer errors
impl From<csv::Error> for MigrationError {
    fn from(err: csv::Error) -> Self {
        MigrationError::Io(format!("CSV write error: {err}"))
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for MigrationError {
    fn from(err: toml::de::Error) -> Self {
        MigrationError::Configuration(format!("TOML parse error: {err}"))
    }
}
