//! Raw record to output row conversion

use crate::core::catalog::{ColumnFormatter, DefaultGenerator, TableSchema};
use crate::core::manifest::DeclaredColumns;
use crate::core::transcode::writer::csv_format;
use crate::core::unl::{split_cells, unescape_delimiters, LogicalLine};
use crate::domain::{MigrationError, Result};
use std::borrow::Cow;

/// One converted row: cells formatted and unescaped, in output order
///
/// Quoting is left to the CSV writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRow(Vec<String>);

impl OutputRow {
    /// Cell values in output order
    pub fn cells(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The row as one quoted CSV line, terminator included
    pub fn to_line(&self) -> Result<String> {
        let mut writer = csv_format().from_writer(Vec::new());
        writer.write_record(&self.0)?;
        let bytes = writer
            .into_inner()
            .map_err(|e| MigrationError::Io(format!("CSV write error: {}", e.error())))?;
        String::from_utf8(bytes).map_err(|e| MigrationError::Io(e.to_string()))
    }
}

enum CellSource {
    Raw(usize),
    Generated(DefaultGenerator),
}

struct PlannedColumn {
    name: String,
    source: CellSource,
    formatter: Option<ColumnFormatter>,
}

enum Plan {
    /// Output columns named by the catalog
    Explicit(Vec<PlannedColumn>),
    /// Raw cells copied in source order; formatters indexed by raw position
    Positional {
        declared: Vec<String>,
        formatters: Vec<Option<ColumnFormatter>>,
    },
}

/// Converts the records of one table
///
/// The column plan is resolved once, so an explicit order naming a column the
/// export neither declares nor defaults fails before any row is read. Default
/// generators live in the plan and advance in row order.
pub struct RowTranscoder {
    table: String,
    delimiter: char,
    plan: Plan,
    rows: u64,
    shape_mismatches: u64,
}

impl RowTranscoder {
    /// Builds the column plan for `table`
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::UndeclaredColumn`] if the explicit order names a
    /// column that is neither declared nor defaulted.
    pub fn new(
        table: impl Into<String>,
        declared: &DeclaredColumns,
        schema: &TableSchema,
        delimiter: char,
    ) -> Result<Self> {
        let table = table.into();

        let plan = match &schema.column_order {
            Some(order) => {
                let mut columns = Vec::with_capacity(order.len());
                for name in order {
                    let source = if let Some(index) = declared.position(name) {
                        CellSource::Raw(index)
                    } else if let Some(default) = schema.default_for(name) {
                        CellSource::Generated(default.generator())
                    } else {
                        return Err(MigrationError::UndeclaredColumn {
                            table,
                            column: name.clone(),
                        });
                    };
                    columns.push(PlannedColumn {
                        name: name.clone(),
                        source,
                        formatter: schema.formatter(name).copied(),
                    });
                }
                Plan::Explicit(columns)
            }
            None => {
                if !schema.defaults.is_empty() {
                    tracing::warn!(
                        table = %table,
                        "Defaults are ignored for tables without column_order"
                    );
                }
                Plan::Positional {
                    declared: declared.iter().map(str::to_string).collect(),
                    formatters: declared
                        .iter()
                        .map(|column| schema.formatter(column).copied())
                        .collect(),
                }
            }
        };

        Ok(Self {
            table,
            delimiter,
            plan,
            rows: 0,
            shape_mismatches: 0,
        })
    }

    /// Table the transcoder was planned for
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Whether the output order comes from the catalog
    pub fn is_explicit(&self) -> bool {
        matches!(self.plan, Plan::Explicit(_))
    }

    /// Rows converted so far
    pub fn rows(&self) -> u64 {
        self.rows
    }

    /// Positional rows whose cell count differed from the declared column count
    pub fn shape_mismatches(&self) -> u64 {
        self.shape_mismatches
    }

    /// Converts one logical record
    ///
    /// `file` names the data file in error messages.
    ///
    /// # Errors
    ///
    /// - [`MigrationError::MalformedRecord`] if a declared column's cell is missing
    /// - [`MigrationError::CellFormat`] if a formatter rejects a value
    pub fn transcode(&mut self, line: &LogicalLine, file: &str) -> Result<OutputRow> {
        let cells = split_cells(&line.text, self.delimiter);
        let delimiter = self.delimiter;

        let row = match &mut self.plan {
            Plan::Explicit(columns) => {
                let mut out = Vec::with_capacity(columns.len());
                for column in columns.iter_mut() {
                    let raw: Cow<'_, str> = match &mut column.source {
                        CellSource::Raw(index) => {
                            let cell = cells.get(*index).ok_or_else(|| {
                                MigrationError::MalformedRecord {
                                    file: file.to_string(),
                                    line: line.line_number,
                                    expected: *index,
                                    found: cells.len(),
                                }
                            })?;
                            Cow::Borrowed(*cell)
                        }
                        CellSource::Generated(generator) => Cow::Owned(generator.next_value()),
                    };
                    out.push(render_cell(
                        column.formatter.as_ref(),
                        &column.name,
                        &raw,
                        delimiter,
                    )?);
                }
                out
            }
            Plan::Positional {
                declared,
                formatters,
            } => {
                // The final cell is the sentinel after the trailing delimiter
                let real = &cells[..cells.len().saturating_sub(1)];
                if real.len() != declared.len() {
                    self.shape_mismatches += 1;
                    tracing::debug!(
                        table = %self.table,
                        file = %file,
                        line = line.line_number,
                        cells = real.len(),
                        declared = declared.len(),
                        "Cell count differs from declared columns"
                    );
                }

                let mut out = Vec::with_capacity(real.len());
                for (index, cell) in real.iter().enumerate() {
                    let formatter = formatters.get(index).copied().flatten();
                    let column = declared.get(index).map(String::as_str).unwrap_or("");
                    out.push(render_cell(formatter.as_ref(), column, cell, delimiter)?);
                }
                out
            }
        };

        self.rows += 1;
        Ok(OutputRow(row))
    }
}

/// Format, then unescape a single cell
fn render_cell(
    formatter: Option<&ColumnFormatter>,
    column: &str,
    raw: &str,
    delimiter: char,
) -> Result<String> {
    let formatted = match formatter {
        Some(formatter) => Cow::Owned(formatter.format(column, raw)?),
        None => Cow::Borrowed(raw),
    };
    Ok(unescape_delimiters(&formatted, delimiter).into_owned())
}
