//! Result formatting.
//!
//! Renders an [`ExecutionOutcome`] as delimited text lines. Lines are produced
//! lazily and carry no terminator; [`write_outcome`] appends the platform line
//! ending as it writes them.

use crate::config::OutputConfig;
use crate::db::{QueryResult, Row};
use std::io::{self, Write};
use std::iter::FusedIterator;
use std::slice;

/// Line terminator used when writing output.
#[cfg(windows)]
pub const LINE_ENDING: &str = "\r\n";
/// Line terminator used when writing output.
#[cfg(not(windows))]
pub const LINE_ENDING: &str = "\n";

/// What running one statement produced.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecutionOutcome {
    /// A mutating statement ran; reported as a single status line.
    RowsAffected { keyword: String, count: u64 },
    /// A query ran; reported as a row table.
    Rows(QueryResult),
}

impl ExecutionOutcome {
    /// Creates the outcome of a mutating statement.
    pub fn rows_affected(keyword: impl Into<String>, count: u64) -> Self {
        Self::RowsAffected {
            keyword: keyword.into(),
            count,
        }
    }

    /// Returns a lazy iterator over the output lines for this outcome.
    pub fn lines<'a>(&'a self, config: &'a OutputConfig) -> Lines<'a> {
        let state = match self {
            Self::RowsAffected { keyword, count } => {
                State::Status(Some(format!("{keyword} is executed. {count} rows affected.")))
            }
            Self::Rows(result) => State::Table {
                header: config.header.then_some(result.columns.as_slice()),
                rows: result.rows.iter(),
                arity: result.columns.len(),
                delimiter: &config.delimiter,
            },
        };
        Lines { state }
    }
}

/// Single-pass iterator over formatted output lines.
pub struct Lines<'a> {
    state: State<'a>,
}

enum State<'a> {
    Status(Option<String>),
    Table {
        header: Option<&'a [String]>,
        rows: slice::Iter<'a, Row>,
        arity: usize,
        delimiter: &'a str,
    },
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        match &mut self.state {
            State::Status(line) => line.take(),
            State::Table {
                header,
                rows,
                arity,
                delimiter,
            } => {
                if let Some(columns) = header.take() {
                    return Some(columns.join(*delimiter));
                }
                let row = rows.next()?;
                debug_assert_eq!(row.len(), *arity, "row arity differs from column count");
                Some(join_cells(row, *delimiter))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match &self.state {
            State::Status(line) => usize::from(line.is_some()),
            State::Table { header, rows, .. } => usize::from(header.is_some()) + rows.len(),
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Lines<'_> {}

impl FusedIterator for Lines<'_> {}

/// Joins a row's cells with the delimiter; NULL cells render as empty strings.
fn join_cells(row: &Row, delimiter: &str) -> String {
    let mut line = String::new();
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            line.push_str(delimiter);
        }
        if let Some(value) = cell {
            line.push_str(value);
        }
    }
    line
}

/// Writes every line of `outcome` to `writer`, each followed by [`LINE_ENDING`].
///
/// Returns the number of lines written.
pub fn write_outcome<W: Write + ?Sized>(
    outcome: &ExecutionOutcome,
    config: &OutputConfig,
    writer: &mut W,
) -> io::Result<usize> {
    let mut written = 0;
    for line in outcome.lines(config) {
        writer.write_all(line.as_bytes())?;
        writer.write_all(LINE_ENDING.as_bytes())?;
        written += 1;
    }
    Ok(written)
}
