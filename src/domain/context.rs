//! Error context extension trait
//!
//! Adds `.context()` and `.with_context()` to `std::io::Result`, turning a
//! bare OS error into a [`MigrationError::Io`] that names the file involved.
//!
//! # Examples
//!
//! ```rust
//! use unl2csv::domain::Result;
//! use unl2csv::domain::context::ResultExt;
//!
//! fn read_manifest(path: &str) -> Result<Vec<u8>> {
//!     std::fs::read(path).with_context(|| format!("Failed to read manifest {path}"))
//! }
//! ```

use crate::domain::errors::MigrationError;
use crate::domain::result::Result;

/// Extension trait for adding context to I/O results
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly; use `.with_context()` when building
    /// it allocates.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C;
}

impl<T> ResultExt<T> for std::io::Result<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display,
    {
        self.map_err(|e| MigrationError::Io(format!("{context}: {e}")))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display,
        F: FnOnce() -> C,
    {
        self.map_err(|e| MigrationError::Io(format!("{}: {e}", f())))
    }
}
