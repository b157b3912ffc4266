//! dbexport manifest parsing
//!
//! The manifest (`<database>.sql`, written next to the `<database>.exp`
//! directory) names the database, lists every table with the data file it was
//! unloaded to, and carries the `create table` statements that fix the column
//! order of each data file.
//!
//! # Example
//!
//! ```
//! use unl2csv::core::manifest::Manifest;
//!
//! # fn example() -> unl2csv::domain::Result<()> {
//! let text = "{ DATABASE shop delimiter | }\n\
//!             { TABLE \"shop\".item row size = 8 }\n\
//!             { unload file name = item00100.unl number of rows = 2 }\n\
//!             create table \"shop\".item\n  (\n    id integer,\n    name char(20)\n  );\n";
//! let manifest = Manifest::parse(text.to_string())?;
//! assert_eq!(manifest.database_name()?, "shop");
//! let columns = manifest.declared_columns(&manifest.entries()[0].table_name_raw)?;
//! assert_eq!(columns.len(), 2);
//! # Ok(())
//! # }
//! ```

pub mod declaration;
pub mod scanner;

pub use declaration::{declared_columns, flatten_manifest, DeclaredColumns};
pub use scanner::{ManifestEntry, ManifestScan, ManifestScanner};

use crate::domain::{MigrationError, Result};

/// A fully read manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    flat: String,
    scan: ManifestScan,
}

impl Manifest {
    /// Scans manifest text and prepares it for column lookups
    pub fn parse(text: String) -> Result<Self> {
        let scan = ManifestScanner::new()?.scan(&text);
        let flat = flatten_manifest(&text);
        Ok(Self { flat, scan })
    }

    /// Database name declared by the manifest
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::ManifestFormat`] if no database declaration was found
    pub fn database_name(&self) -> Result<&str> {
        self.scan.database_name.as_deref().ok_or_else(|| {
            MigrationError::ManifestFormat("No '{ DATABASE <name> }' declaration found".to_string())
        })
    }

    /// Field delimiter announced by the database declaration
    pub fn delimiter(&self) -> Option<char> {
        self.scan.delimiter
    }

    /// Tables with their data files, in discovery order
    pub fn entries(&self) -> &[ManifestEntry] {
        &self.scan.entries
    }

    /// Raw scan result
    pub fn scan(&self) -> &ManifestScan {
        &self.scan
    }

    /// Declared column order of a table, looked up by its raw manifest name
    pub fn declared_columns(&self, table_name_raw: &str) -> Result<DeclaredColumns> {
        declared_columns(&self.flat, table_name_raw)
    }
}
