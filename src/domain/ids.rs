//! Table identifier types
//!
//! Newtype wrapper for table names as they appear in a dbexport manifest,
//! e.g. `"orveus".pe_bei_it`. Quote characters are stripped on construction so
//! lookups always see the plain `schema.table` form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Qualified table name
///
/// # Examples
///
/// ```
/// use unl2csv::domain::ids::TableName;
///
/// let table = TableName::new("\"orveus\".pe_bei_it").unwrap();
/// assert_eq!(table.as_str(), "orveus.pe_bei_it");
/// assert_eq!(table.schema(), Some("orveus"));
/// assert_eq!(table.unqualified(), "pe_bei_it");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableName(String);

impl TableName {
    /// Creates a table name from its raw manifest form, stripping quotes
    pub fn new(raw: impl Into<String>) -> Result<Self, String> {
        let name: String = raw.into().chars().filter(|c| *c != '"').collect();
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err("Table name cannot be empty".to_string());
        }
        if name.ends_with('.') {
            return Err(format!("Table name '{name}' has an empty table part"));
        }
        Ok(Self(name))
    }

    /// Returns the table name as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Schema part, if the name is qualified
    pub fn schema(&self) -> Option<&str> {
        self.0.split_once('.').map(|(schema, _)| schema)
    }

    /// Table part without schema; the key used for catalog lookups
    pub fn unqualified(&self) -> &str {
        self.0
            .split_once('.')
            .map(|(_, table)| table)
            .unwrap_or(&self.0)
    }

    /// Same table placed in another schema
    pub fn with_schema(&self, schema: &str) -> Self {
        Self(format!("{schema}.{}", self.unqualified()))
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TableName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl AsRef<str> for TableName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
