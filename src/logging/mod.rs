//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output with configurable log levels
//! - JSON-formatted local log files with rotation
//!
//! # Example
//!
//! ```no_run
//! use unl2csv::logging::init_logging;
//! use unl2csv::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!(table = "orveus.person", "Converting table");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard, LOG_FILE_NAME};

/// Log the start of a table conversion
///
/// # Example
///
/// ```no_run
/// use unl2csv::log_table_start;
///
/// log_table_start!("orveus.person", "perso00101.unl");
/// ```
#[macro_export]
macro_rules! log_table_start {
    ($table:expr, $data_file:expr) => {
        tracing::info!(
            table = %$table,
            data_file = %$data_file,
            "Converting table"
        );
    };
}

/// Log the completion of a table conversion
///
/// # Example
///
/// ```no_run
/// use unl2csv::log_table_complete;
/// use std::time::Duration;
///
/// log_table_complete!("orveus.person", 42, "orveus.person.csv", Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_table_complete {
    ($table:expr, $rows:expr, $csv_file:expr, $duration:expr) => {
        tracing::info!(
            table = %$table,
            rows = $rows,
            csv_file = %$csv_file,
            duration_ms = $duration.as_millis(),
            "Table converted"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use unl2csv::log_error_with_context;
/// use unl2csv::domain::MigrationError;
///
/// let error = MigrationError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = %$context,
            "Error occurred"
        );
    };
}
