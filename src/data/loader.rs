use std::path::{Path, PathBuf};

use log::debug;
use thiserror::Error;

use super::model::{EnsembleSeries, ObservationSeries};

// ---------------------------------------------------------------------------
// Table layouts
// ---------------------------------------------------------------------------

/// Fixed shape of a tecplot-style table written by the filter.
///
/// Blank lines are ignored and never count towards `preamble_lines`.
/// After the preamble comes one column-title row, then the data rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Metadata lines before the column-title row.
    pub preamble_lines: usize,
    /// Exact number of data rows to read; `None` reads to end of file.
    pub rows: Option<usize>,
    /// Minimum number of whitespace-separated fields per data row.
    pub min_columns: usize,
}

/// `<variable>_<stage>.dat`: time, mean, std dev, members…, trailing field.
pub const ENSEMBLE_LAYOUT: TableLayout = TableLayout {
    preamble_lines: 53,
    rows: Some(366),
    min_columns: 4,
};

/// `obs<H|D>.dat`: index, time, observed value, std dev.
pub const OBSERVATION_LAYOUT: TableLayout = TableLayout {
    preamble_lines: 3,
    rows: None,
    min_columns: 4,
};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: file ends before the column-title row", path.display())]
    MissingTitleRow { path: PathBuf },

    #[error("{}: expected {expected} data rows, found {found}", path.display())]
    TooFewRows {
        path: PathBuf,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: expected at least {expected} columns, found {found}", path.display())]
    TooFewColumns {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error(
        "{}:{line}: expected {expected} columns like the first data row, found {found}",
        path.display()
    )]
    RaggedRow {
        path: PathBuf,
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("{}:{line}: column {column} is not a number: '{token}'", path.display())]
    BadNumber {
        path: PathBuf,
        line: usize,
        column: usize,
        token: String,
    },
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a prior or posterior ensemble file.
///
/// The last column of the table is not a member trajectory and is dropped.
pub fn load_ensemble(path: &Path) -> Result<EnsembleSeries, LoadError> {
    let table = read_table(path, &ENSEMBLE_LAYOUT)?;
    let last = table.columns - 1;

    let series = EnsembleSeries {
        time: table.column(0),
        mean: table.column(1),
        std_dev: table.column(2),
        members: (3..last).map(|c| table.column(c)).collect(),
    };
    debug!(
        "{}: {} rows, {} members",
        path.display(),
        series.len(),
        series.member_count()
    );
    Ok(series)
}

/// Load an observed-data file. Column 0 is a running index and is ignored.
pub fn load_observations(path: &Path) -> Result<ObservationSeries, LoadError> {
    let table = read_table(path, &OBSERVATION_LAYOUT)?;

    Ok(ObservationSeries {
        time: table.column(1),
        observed: table.column(2),
        std_dev: table.column(3),
    })
}

// ---------------------------------------------------------------------------
// Whitespace table reader
// ---------------------------------------------------------------------------

/// Row-major numeric table with a uniform column count.
#[derive(Debug)]
struct Table {
    columns: usize,
    rows: Vec<Vec<f64>>,
}

impl Table {
    fn column(&self, index: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[index]).collect()
    }
}

fn read_table(path: &Path, layout: &TableLayout) -> Result<Table, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_table(&text, path, layout)
}

fn parse_table(text: &str, path: &Path, layout: &TableLayout) -> Result<Table, LoadError> {
    // (1-based line number, content) of every non-blank line.
    let mut lines = text
        .lines()
        .enumerate()
        .filter(|(_, l)| !l.trim().is_empty())
        .map(|(i, l)| (i + 1, l))
        .skip(layout.preamble_lines);

    if lines.next().is_none() {
        return Err(LoadError::MissingTitleRow {
            path: path.to_path_buf(),
        });
    }

    let mut columns = 0;
    let mut rows = Vec::with_capacity(layout.rows.unwrap_or(0));

    for (line_no, line) in lines {
        if layout.rows.is_some_and(|n| rows.len() == n) {
            break;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if rows.is_empty() {
            if tokens.len() < layout.min_columns {
                return Err(LoadError::TooFewColumns {
                    path: path.to_path_buf(),
                    line: line_no,
                    expected: layout.min_columns,
                    found: tokens.len(),
                });
            }
            columns = tokens.len();
        } else if tokens.len() != columns {
            return Err(LoadError::RaggedRow {
                path: path.to_path_buf(),
                line: line_no,
                expected: columns,
                found: tokens.len(),
            });
        }

        let row = tokens
            .iter()
            .enumerate()
            .map(|(column, tok)| {
                tok.parse::<f64>().map_err(|_| LoadError::BadNumber {
                    path: path.to_path_buf(),
                    line: line_no,
                    column,
                    token: tok.to_string(),
                })
            })
            .collect::<Result<Vec<f64>, _>>()?;
        rows.push(row);
    }

    if let Some(expected) = layout.rows {
        if rows.len() < expected {
            return Err(LoadError::TooFewRows {
                path: path.to_path_buf(),
                expected,
                found: rows.len(),
            });
        }
    }

    Ok(Table { columns, rows })
}
