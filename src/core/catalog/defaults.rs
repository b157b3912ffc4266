//! Generated values for columns the export does not contain

use serde::{Deserialize, Serialize};

/// How a missing column is filled
///
/// In TOML: `{ constant = "" }` or `{ auto_increment = 1 }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultValue {
    /// The same text in every row
    Constant(String),

    /// A counter starting at the seed, one step per row
    AutoIncrement(i64),
}

impl DefaultValue {
    /// Starts a fresh generator for one table conversion
    pub fn generator(&self) -> DefaultGenerator {
        match self {
            DefaultValue::Constant(value) => DefaultGenerator::Constant(value.clone()),
            DefaultValue::AutoIncrement(seed) => DefaultGenerator::AutoIncrement { next: *seed },
        }
    }
}

/// Per-table default state
///
/// Owned by the row transcoder of a single table, so counters never leak
/// between tables or runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultGenerator {
    Constant(String),
    AutoIncrement { next: i64 },
}

impl DefaultGenerator {
    /// Value for the current row; advances counters
    pub fn next_value(&mut self) -> String {
        match self {
            DefaultGenerator::Constant(value) => value.clone(),
            DefaultGenerator::AutoIncrement { next } => {
                let value = *next;
                *next = next.wrapping_add(1);
                value.to_string()
            }
        }
    }
}
