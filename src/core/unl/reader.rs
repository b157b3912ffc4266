//! Escape-aware line reader for UNL data files

use super::CodePage;
use crate::domain::{MigrationError, Result};
use std::io::BufRead;

/// One logical record of a data file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// Physical line number (1-based) the record starts on
    pub line_number: usize,

    /// Record text with continuations joined and line ending normalised
    pub text: String,
}

/// Streams logical records out of a UNL byte stream.
///
/// Physical lines are split on `\n` and decoded with the export's code page.
/// A physical line ending in a backslash is joined with the next one through
/// an embedded newline; a record ending in `\r` gets the delimiter in its
/// place. Blank records are skipped.
pub struct UnlLineReader<R> {
    reader: R,
    code_page: CodePage,
    delimiter: char,
    source_name: String,
    physical_line: usize,
    buf: Vec<u8>,
    finished: bool,
}

impl<R: BufRead> UnlLineReader<R> {
    /// Creates a reader; `source_name` is only used in error messages
    pub fn new(
        reader: R,
        code_page: CodePage,
        delimiter: char,
        source_name: impl Into<String>,
    ) -> Self {
        Self {
            reader,
            code_page,
            delimiter,
            source_name: source_name.into(),
            physical_line: 0,
            buf: Vec::new(),
            finished: false,
        }
    }

    /// Number of physical lines consumed so far
    pub fn physical_lines(&self) -> usize {
        self.physical_line
    }

    fn read_physical(&mut self) -> Result<Option<String>> {
        self.buf.clear();
        let read = self.reader.read_until(b'\n', &mut self.buf).map_err(|e| {
            MigrationError::Io(format!(
                "Failed to read {} after line {}: {}",
                self.source_name, self.physical_line, e
            ))
        })?;
        if read == 0 {
            return Ok(None);
        }
        self.physical_line += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
        }
        Ok(Some(self.code_page.decode(&self.buf)))
    }

    /// Reads the next logical record, `Ok(None)` at the end of the stream
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::TruncatedRecord`] when the stream ends while
    /// a continuation is pending.
    pub fn next_line(&mut self) -> Result<Option<LogicalLine>> {
        loop {
            let Some(mut text) = self.read_physical()? else {
                return Ok(None);
            };
            let line_number = self.physical_line;

            while text.ends_with('\\') {
                text.pop();
                text.push('\n');
                match self.read_physical()? {
                    Some(next) => text.push_str(&next),
                    None => {
                        return Err(MigrationError::TruncatedRecord {
                            file: self.source_name.clone(),
                            line: line_number,
                        })
                    }
                }
            }

            if text.ends_with('\r') {
                text.pop();
                text.push(self.delimiter);
            }

            if text.is_empty() {
                tracing::trace!(file = %self.source_name, line = line_number, "Skipping blank line");
                continue;
            }

            return Ok(Some(LogicalLine { line_number, text }));
        }
    }
}

impl<R: BufRead> Iterator for UnlLineReader<R> {
    type Item = Result<LogicalLine>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.next_line() {
            Ok(Some(line)) => Some(Ok(line)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}
