//! Row transcoding and CSV output
//!
//! [`RowTranscoder`] turns one logical UNL record into one [`OutputRow`]:
//! each output cell is formatted, then unescaped. [`CsvFileWriter`] quotes
//! every cell, doubles embedded quotes and writes the rows of one table as
//! UTF-16 with a byte order mark.

pub mod row;
pub mod writer;

pub use row::{OutputRow, RowTranscoder};
pub use writer::{csv_format, CsvFileWriter, CELL_SEPARATOR, PARTIAL_SUFFIX, ROW_TERMINATOR};
