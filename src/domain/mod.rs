//! Domain types for unl2csv.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Table identifiers** ([`TableName`]) that normalise manifest spellings
//! - **Error types** ([`MigrationError`])
//! - **Result type alias** ([`Result`])
//! - **Context helpers** ([`context::ResultExt`]) for I/O failures
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, MigrationError>`]:
//!
//! ```rust
//! use unl2csv::domain::{MigrationError, Result};
//!
//! fn example() -> Result<()> {
//!     let config = unl2csv::config::AppConfig::default();
//!     config.validate().map_err(MigrationError::Configuration)?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod ids;
pub mod result;

// Re-export commonly used types for convenience
pub use context::ResultExt;
pub use errors::MigrationError;
pub use ids::TableName;
pub use result::Result;
