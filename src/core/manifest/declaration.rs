//! Column order recovery from `create table` clauses
//!
//! The raw cells of a data file follow the column order of the table's
//! `create table` statement in the manifest. Definitions are separated by a
//! comma followed by whitespace, so `decimal(8,2)` stays intact; a quoted
//! default value containing ", " is not supported.

use crate::domain::{MigrationError, Result};
use serde::Serialize;

/// Column identifiers in export order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredColumns(Vec<String>);

impl DeclaredColumns {
    /// Wraps an already known column order
    pub fn new(columns: Vec<String>) -> Self {
        Self(columns)
    }

    /// Raw cell index of a column
    pub fn position(&self, column: &str) -> Option<usize> {
        self.0.iter().position(|c| c == column)
    }

    /// Column name at a raw cell index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(index).map(String::as_str)
    }

    /// Number of declared columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no column was declared
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the column names in order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

/// Joins the manifest into one line so clauses spanning lines can be searched
pub fn flatten_manifest(manifest: &str) -> String {
    manifest
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extracts the declared column order of a table from flattened manifest text
///
/// `table_name_raw` is the name exactly as the manifest writes it, quotes
/// included, e.g. `"orveus".pe_bei_it`.
///
/// # Errors
///
/// Returns [`MigrationError::ManifestFormat`] when the `create table` clause of
/// the table, its parenthesised column list, or any column name is missing.
pub fn declared_columns(flat_manifest: &str, table_name_raw: &str) -> Result<DeclaredColumns> {
    let clause = format!("create table {table_name_raw} ");
    let start = flat_manifest.find(&clause).ok_or_else(|| {
        MigrationError::ManifestFormat(format!("No 'create table' clause for {table_name_raw}"))
    })? + clause.len();
    let rest = &flat_manifest[start..];

    let open = rest.find('(').ok_or_else(|| {
        MigrationError::ManifestFormat(format!("No column list after 'create table {table_name_raw}'"))
    })?;
    let rest = &rest[open + 1..];

    let close = rest.find(");").ok_or_else(|| {
        MigrationError::ManifestFormat(format!("Unterminated column list for {table_name_raw}"))
    })?;
    let definitions = &rest[..close];

    let mut columns = Vec::new();
    for definition in definitions.split(", ") {
        let name = definition.split_whitespace().next().ok_or_else(|| {
            MigrationError::ManifestFormat(format!(
                "Empty column definition in 'create table {table_name_raw}'"
            ))
        })?;
        columns.push(name.to_string());
    }

    Ok(DeclaredColumns(columns))
}
