//! Run orchestration and reporting
//!
//! This module provides:
//! - Migration coordination over all tables of a manifest
//! - Bulk load script generation
//! - Summary and reporting

pub mod coordinator;
pub mod load_script;
pub mod summary;

pub use coordinator::MigrationCoordinator;
pub use load_script::{LoadScriptEmitter, LoadScriptEntry, DEFAULT_POST_LOAD_SQL};
pub use summary::{MigrationSummary, TableReport};
