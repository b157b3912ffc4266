//! Reading Informix UNL data files
//!
//! A UNL file holds one record per line with cells separated by a single
//! delimiter character. Three escapes appear in the raw bytes:
//!
//! - a backslash at the end of a physical line continues the record on the
//!   next line (the field contains a newline),
//! - a backslash before the delimiter makes it part of the cell text,
//! - a trailing carriage return stands in for the final delimiter.
//!
//! [`UnlLineReader`] undoes the line level escapes and yields logical
//! records, [`split_cells`] cuts a record into raw cells while leaving the
//! delimiter escapes in place for the transcoder.

pub mod reader;
pub mod split;

pub use reader::{LogicalLine, UnlLineReader};
pub use split::{escape_delimiters, split_cells, unescape_delimiters};

use crate::domain::{MigrationError, Result};
use oem_cp::code_table::{DECODING_TABLE_CP437, DECODING_TABLE_CP850, DECODING_TABLE_CP858};
use oem_cp::decode_string_complete_table;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Legacy 8-bit code page of an export
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CodePage {
    /// IBM437, original IBM PC
    Cp437,
    /// IBM850, DOS Latin-1 (the dbexport default for western European locales)
    #[default]
    Cp850,
    /// IBM858, IBM850 with the euro sign
    Cp858,
}

impl CodePage {
    /// Decodes raw bytes into text; every byte maps to exactly one char
    pub fn decode(&self, bytes: &[u8]) -> String {
        let table = match self {
            CodePage::Cp437 => &DECODING_TABLE_CP437,
            CodePage::Cp850 => &DECODING_TABLE_CP850,
            CodePage::Cp858 => &DECODING_TABLE_CP858,
        };
        decode_string_complete_table(bytes, table)
    }

    /// Configuration name of the code page
    pub fn as_str(&self) -> &'static str {
        match self {
            CodePage::Cp437 => "cp437",
            CodePage::Cp850 => "cp850",
            CodePage::Cp858 => "cp858",
        }
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CodePage {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().replace(['-', '_'], "").as_str() {
            "cp437" | "ibm437" => Ok(Self::Cp437),
            "cp850" | "ibm850" => Ok(Self::Cp850),
            "cp858" | "ibm858" => Ok(Self::Cp858),
            _ => Err(MigrationError::Configuration(format!(
                "Unsupported code page: {s}. Expected one of: cp437, cp850, cp858"
            ))),
        }
    }
}
