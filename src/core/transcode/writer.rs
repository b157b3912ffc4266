//! UTF-16 CSV output files

use super::OutputRow;
use crate::config::OutputEncoding;
use crate::domain::{MigrationError, Result, ResultExt};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

const BUFFER_SIZE: usize = 256 * 1024;

/// Separator between output cells
pub const CELL_SEPARATOR: u8 = b',';

/// Terminator of every output row
pub const ROW_TERMINATOR: u8 = b'\n';

/// Suffix of a CSV file that is still being written
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Output dialect: no header, every cell quoted, embedded quotes doubled
pub fn csv_format() -> WriterBuilder {
    let mut builder = WriterBuilder::new();
    builder
        .has_headers(false)
        .flexible(true)
        .delimiter(CELL_SEPARATOR)
        .quote_style(QuoteStyle::Always)
        .double_quote(true)
        .terminator(Terminator::Any(ROW_TERMINATOR));
    builder
}

/// Re-encodes the UTF-8 stream of the CSV writer as UTF-16
///
/// The CSV writer flushes its buffer at arbitrary byte offsets, so a
/// character split across two writes is held back until it is complete.
struct Utf16Sink<W> {
    inner: W,
    encoding: OutputEncoding,
    pending: Vec<u8>,
    encoded: Vec<u8>,
}

impl<W: Write> Utf16Sink<W> {
    fn new(inner: W, encoding: OutputEncoding) -> Self {
        Self {
            inner,
            encoding,
            pending: Vec::new(),
            encoded: Vec::new(),
        }
    }

    fn into_inner(self) -> io::Result<W> {
        if self.pending.is_empty() {
            Ok(self.inner)
        } else {
            Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "CSV output ended inside a UTF-8 sequence",
            ))
        }
    }
}

impl<W: Write> Write for Utf16Sink<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        let complete = match std::str::from_utf8(&self.pending) {
            Ok(text) => text.len(),
            Err(e) if e.error_len().is_none() => e.valid_up_to(),
            Err(e) => return Err(io::Error::new(io::ErrorKind::InvalidData, e)),
        };
        let text = std::str::from_utf8(&self.pending[..complete])
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        self.encoded.clear();
        for unit in text.encode_utf16() {
            let pair = match self.encoding {
                OutputEncoding::Utf16Be => unit.to_be_bytes(),
                OutputEncoding::Utf16Le => unit.to_le_bytes(),
            };
            self.encoded.extend_from_slice(&pair);
        }
        self.inner.write_all(&self.encoded)?;
        self.pending.drain(..complete);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Writes one table's CSV file
///
/// Rows go to `<name>.partial`; [`CsvFileWriter::finish`] flushes and renames
/// the file into place. An unfinished or failed writer deletes the partial
/// file, so an aborted table never leaves a file that looks complete.
pub struct CsvFileWriter {
    final_path: PathBuf,
    partial_path: PathBuf,
    writer: Option<Writer<Utf16Sink<BufWriter<File>>>>,
    rows_written: u64,
}

impl CsvFileWriter {
    /// Creates the partial file and writes the byte order mark
    pub fn create(path: impl AsRef<Path>, encoding: OutputEncoding) -> Result<Self> {
        let final_path = path.as_ref().to_path_buf();
        let mut partial_name = final_path.as_os_str().to_os_string();
        partial_name.push(PARTIAL_SUFFIX);
        let partial_path = PathBuf::from(partial_name);

        let file = File::create(&partial_path)
            .with_context(|| format!("Failed to create {}", partial_path.display()))?;

        let mut sink = Utf16Sink::new(BufWriter::with_capacity(BUFFER_SIZE, file), encoding);
        let bom = sink
            .write_all("\u{feff}".as_bytes())
            .with_context(|| format!("Failed to write {}", partial_path.display()));
        let writer = Self {
            final_path,
            partial_path,
            writer: Some(csv_format().from_writer(sink)),
            rows_written: 0,
        };
        bom?;
        Ok(writer)
    }

    /// Appends one row
    pub fn write_row(&mut self, row: &OutputRow) -> Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.write_record(row.cells()).map_err(|e| {
                MigrationError::Io(format!("Failed to write {}: {e}", self.partial_path.display()))
            })?;
            self.rows_written += 1;
        }
        Ok(())
    }

    /// Rows written so far
    pub fn rows_written(&self) -> u64 {
        self.rows_written
    }

    /// Path the file will have once finished
    pub fn path(&self) -> &Path {
        &self.final_path
    }

    /// Flushes, closes and renames the file into place
    ///
    /// On failure the partial file is removed before the error is returned.
    pub fn finish(mut self) -> Result<PathBuf> {
        let Some(writer) = self.writer.take() else {
            return Ok(self.final_path.clone());
        };
        match self.complete(writer) {
            Ok(()) => Ok(self.final_path.clone()),
            Err(e) => {
                self.remove_partial();
                Err(e)
            }
        }
    }

    fn complete(&self, writer: Writer<Utf16Sink<BufWriter<File>>>) -> Result<()> {
        let sink = writer.into_inner().map_err(|e| {
            MigrationError::Io(format!(
                "Failed to flush {}: {}",
                self.partial_path.display(),
                e.error()
            ))
        })?;
        let mut file = sink
            .into_inner()
            .with_context(|| format!("Failed to flush {}", self.partial_path.display()))?;
        file.flush()
            .with_context(|| format!("Failed to flush {}", self.partial_path.display()))?;
        file.get_ref()
            .sync_all()
            .with_context(|| format!("Failed to sync {}", self.partial_path.display()))?;
        drop(file);

        std::fs::rename(&self.partial_path, &self.final_path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                self.partial_path.display(),
                self.final_path.display()
            )
        })
    }

    fn remove_partial(&self) {
        if let Err(e) = std::fs::remove_file(&self.partial_path) {
            tracing::warn!(
                file = %self.partial_path.display(),
                error = %e,
                "Failed to remove partial CSV file"
            );
        } else {
            tracing::debug!(file = %self.partial_path.display(), "Removed partial CSV file");
        }
    }
}

impl Drop for CsvFileWriter {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            drop(writer);
            self.remove_partial();
        }
    }
}
