//! Line scanner for dbexport manifests
//!
//! Recognises the three comment lines dbexport writes around every table:
//!
//! ```text
//! { DATABASE orveus  delimiter | }
//! { TABLE "orveus".pe_bei_it row size = 8 number of columns = 3 index size = 0 }
//! { unload file name = pe_be00100.unl number of rows = 12 }
//! ```

use crate::domain::{MigrationError, Result};
use regex::Regex;
use serde::Serialize;

/// A table block of the manifest and the data file holding its rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestEntry {
    /// Table name as written in the manifest, quotes included
    pub table_name_raw: String,

    /// File name of the unloaded data, relative to the data directory
    pub data_file_name: String,
}

/// Outcome of one pass over the manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ManifestScan {
    /// Database name; the first declaration wins
    pub database_name: Option<String>,

    /// Field delimiter announced in the database declaration
    pub delimiter: Option<char>,

    /// Table to data file pairs in discovery order
    pub entries: Vec<ManifestEntry>,
}

/// Single forward pass over manifest lines
///
/// Only one (table, file) pair is open at a time. A table declaration followed
/// by its unload file name completes the pair; a second table declaration
/// before the file is seen replaces the pending one.
pub struct ManifestScanner {
    database_pattern: Regex,
    table_pattern: Regex,
    unload_pattern: Regex,
}

impl ManifestScanner {
    /// Compiles the line patterns
    pub fn new() -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| {
                MigrationError::Configuration(format!("Invalid manifest pattern {pattern}: {e}"))
            })
        };
        Ok(Self {
            database_pattern: compile(r"^\{ DATABASE (\w+)(?:.*?\bdelimiter (\S))?.*$")?,
            table_pattern: compile(r#"^\{ TABLE (["\w.]+).*$"#)?,
            unload_pattern: compile(r#"^\{ unload file name = (["\w.]+).*$"#)?,
        })
    }

    /// Scans manifest text line by line
    pub fn scan(&self, manifest: &str) -> ManifestScan {
        let mut scan = ManifestScan::default();
        let mut pending_table: Option<String> = None;
        let mut pending_file: Option<String> = None;

        for (idx, line) in manifest.lines().enumerate() {
            let line = line.trim_end_matches('\r');

            if let Some(caps) = self.database_pattern.captures(line) {
                if scan.database_name.is_none() {
                    scan.database_name = Some(caps[1].to_string());
                    scan.delimiter = caps.get(2).and_then(|m| m.as_str().chars().next());
                    tracing::debug!(database = %&caps[1], line = idx + 1, "Found database declaration");
                } else {
                    tracing::debug!(line = idx + 1, "Ignoring repeated database declaration");
                }
            } else if let Some(caps) = self.table_pattern.captures(line) {
                if let Some(previous) = pending_table.replace(caps[1].to_string()) {
                    tracing::warn!(
                        table = %previous,
                        line = idx + 1,
                        "Table declared without unload file before next table"
                    );
                }
            } else if let Some(caps) = self.unload_pattern.captures(line) {
                pending_file = Some(caps[1].to_string());
            }

            match (pending_table.take(), pending_file.take()) {
                (Some(table_name_raw), Some(data_file_name)) => {
                    scan.entries.push(ManifestEntry {
                        table_name_raw,
                        data_file_name,
                    });
                }
                (table, file) => {
                    pending_table = table;
                    pending_file = file;
                }
            }
        }

        if let Some(table) = pending_table {
            tracing::warn!(table = %table, "Manifest ended before the table's unload file was named");
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"{ DATABASE orveus  delimiter | }

grant dba to "informix";

{ TABLE "orveus".pe_bei_it row size = 8 number of columns = 3 index size = 0 }
{ unload file name = pe_be00100.unl number of rows = 12 }

create table "orveus".pe_bei_it
  (
    pe_id integer,
    it_id integer,
    pe_it_anwinfo char(1)
  );

{ TABLE "orveus".person row size = 120 number of columns = 4 index size = 9 }
{ unload file name = perso00101.unl number of rows = 3 }

create table "orveus".person
  (
    pe_id serial not null ,
    pe_vorname char(25),
    pe_nachname char(25),
    pe_bem varchar(255)
  );
"#;

    #[test]
    fn test_scan_finds_database_and_tables() {
        let scan = ManifestScanner::new().unwrap().scan(MANIFEST);
        assert_eq!(scan.database_name.as_deref(), Some("orveus"));
        assert_eq!(scan.delimiter, Some('|'));
        assert_eq!(
            scan.entries,
            vec![
                ManifestEntry {
                    table_name_raw: "\"orveus\".pe_bei_it".to_string(),
                    data_file_name: "pe_be00100.unl".to_string(),
                },
                ManifestEntry {
                    table_name_raw: "\"orveus\".person".to_string(),
                    data_file_name: "perso00101.unl".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_first_database_wins() {
        let text = "{ DATABASE first }\n{ DATABASE second delimiter ; }\n";
        let scan = ManifestScanner::new().unwrap().scan(text);
        assert_eq!(scan.database_name.as_deref(), Some("first"));
        assert_eq!(scan.delimiter, None);
    }

    #[test]
    fn test_pair_spanning_lines() {
        let text = "{ TABLE t1 row size = 1 }\nsome text\n\n{ unload file name = t1.unl }\n";
        let scan = ManifestScanner::new().unwrap().scan(text);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].table_name_raw, "t1");
        assert_eq!(scan.entries[0].data_file_name, "t1.unl");
    }

    #[test]
    fn test_second_table_replaces_pending_one() {
        let text = "{ TABLE a }\n{ TABLE b }\n{ unload file name = b.unl }\n";
        let scan = ManifestScanner::new().unwrap().scan(text);
        assert_eq!(scan.entries.len(), 1);
        assert_eq!(scan.entries[0].table_name_raw, "b");
    }

    #[test]
    fn test_patterns_are_anchored() {
        let text = "  { TABLE a }\n-- { unload file name = a.unl }\n";
        let scan = ManifestScanner::new().unwrap().scan(text);
        assert!(scan.entries.is_empty());
        assert!(scan.database_name.is_none());
    }

    #[test]
    fn test_crlf_manifest() {
        let text = "{ DATABASE db delimiter | }\r\n{ TABLE x }\r\n{ unload file name = x.unl }\r\n";
        let scan = ManifestScanner::new().unwrap().scan(text);
        assert_eq!(scan.database_name.as_deref(), Some("db"));
        assert_eq!(scan.delimiter, Some('|'));
        assert_eq!(scan.entries[0].data_file_name, "x.unl");
    }
}
