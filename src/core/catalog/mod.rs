//! Per-table conversion rules
//!
//! The catalog tells the transcoder, for each exported table, which schema
//! the CSV is loaded into, which columns to emit in which order, how to
//! rewrite certain values and how to fill columns the export lacks. Tables
//! without an entry are copied positionally with no rewriting.
//!
//! Entries come from an external catalog file (`[catalog] path`) and from
//! `[tables.*]` blocks of the main configuration; an inline entry replaces a
//! file entry of the same name.

pub mod defaults;
pub mod formatters;

pub use defaults::{DefaultGenerator, DefaultValue};
pub use formatters::ColumnFormatter;

use crate::config::AppConfig;
use crate::domain::{MigrationError, Result, ResultExt};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Conversion rules of one table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableSchema {
    /// Schema replacing the exported one in the output table name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_schema: Option<String>,

    /// Output columns in order; absent means positional copy
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_order: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub formatters: BTreeMap<String, ColumnFormatter>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub defaults: BTreeMap<String, DefaultValue>,
}

impl TableSchema {
    /// Formatter attached to a column
    pub fn formatter(&self, column: &str) -> Option<&ColumnFormatter> {
        self.formatters.get(column)
    }

    /// Default value attached to a column
    pub fn default_for(&self, column: &str) -> Option<&DefaultValue> {
        self.defaults.get(column)
    }

    /// Whether the table is converted with an explicit column order
    pub fn is_explicit(&self) -> bool {
        self.column_order.is_some()
    }

    /// Validates the entry
    ///
    /// # Errors
    ///
    /// Returns an error for blank names or a column listed twice in `column_order`
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(schema) = &self.target_schema {
            if schema.trim().is_empty() {
                return Err("target_schema cannot be empty".to_string());
            }
            if schema.contains('.') || schema.contains('"') {
                return Err(format!("target_schema '{schema}' must be a bare identifier"));
            }
        }

        if let Some(order) = &self.column_order {
            let mut seen = HashSet::new();
            for column in order {
                if column.trim().is_empty() {
                    return Err("column_order contains an empty column name".to_string());
                }
                if !seen.insert(column.as_str()) {
                    return Err(format!("column_order lists '{column}' more than once"));
                }
            }
        }

        if self.formatters.keys().chain(self.defaults.keys()).any(|c| c.trim().is_empty()) {
            return Err("formatters and defaults need non-empty column names".to_string());
        }

        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogFile {
    #[serde(default)]
    tables: BTreeMap<String, TableSchema>,
}

/// Lookup of table rules by unqualified table name
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: BTreeMap<String, TableSchema>,
    fallback: TableSchema,
}

impl SchemaRegistry {
    /// Creates a registry from ready entries
    pub fn new(tables: BTreeMap<String, TableSchema>) -> Self {
        Self {
            tables,
            fallback: TableSchema::default(),
        }
    }

    /// Parses catalog TOML text
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::Configuration`] if the text is not a valid
    /// catalog or an entry fails validation.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(text)?;
        validate_entries(&file.tables)?;
        Ok(Self::new(file.tables))
    }

    /// Reads a catalog file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MigrationError::Configuration(format!(
                "Catalog file not found: {}",
                path.display()
            )));
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        Self::from_toml_str(&text)
    }

    /// Builds the registry a run uses: the catalog file, if configured,
    /// overlaid with the inline `[tables.*]` entries
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let mut registry = match &config.catalog.path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let from_file = registry.len();

        for (name, table) in &config.tables {
            if registry.tables.insert(name.clone(), table.clone()).is_some() {
                tracing::debug!(table = %name, "Inline table entry overrides catalog file");
            }
        }

        tracing::debug!(
            catalog_tables = from_file,
            inline_tables = config.tables.len(),
            total = registry.len(),
            "Table catalog loaded"
        );
        Ok(registry)
    }

    /// Entry for an unqualified table name
    pub fn lookup(&self, table: &str) -> Option<&TableSchema> {
        self.tables.get(table)
    }

    /// Entry for a table, or the empty positional entry
    pub fn schema_for(&self, table: &str) -> &TableSchema {
        self.lookup(table).unwrap_or(&self.fallback)
    }

    /// Number of tables with rules
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether no table has rules
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Table names with rules, sorted
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

fn validate_entries(tables: &BTreeMap<String, TableSchema>) -> Result<()> {
    for (name, table) in tables {
        if name.trim().is_empty() {
            return Err(MigrationError::Configuration(
                "Catalog contains a table with an empty name".to_string(),
            ));
        }
        table
            .validate()
            .map_err(|e| MigrationError::Configuration(format!("tables.{name}: {e}")))?;
    }
    Ok(())
}
