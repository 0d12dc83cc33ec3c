//! CSV row decoder for the school data files.
//!
//! Every input file is read to completion into a [`Table`]: the trimmed header
//! plus an ordered list of [`Row`]s mapping column names to trimmed string
//! values. Typing of the values is left to the grading stages.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use tracing::debug;

use crate::error::{ReportError, Result};

/// One decoded CSV record, keyed by header name in header order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Row {
    fields: Vec<(String, String)>,
}

impl Row {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// Builds a row from `(column, value)` literals. Mostly useful in tests.
    pub fn from_pairs(pairs: &[(&str, &str)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    /// Returns the value stored under `column`, if the column exists.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the value under `column` as an owned string, empty if absent.
    pub fn text(&self, column: &str) -> String {
        self.get(column).unwrap_or_default().to_string()
    }

    /// Parses the value under `column` as an integer.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MalformedField`] if the value is absent or is not
    /// a base-10 integer.
    pub fn int(&self, column: &str) -> Result<i64> {
        let value = self.get(column).unwrap_or_default();
        value.parse::<i64>().map_err(|_| ReportError::MalformedField {
            field: column.to_string(),
            value: value.to_string(),
            row: self.clone(),
        })
    }
}

/// Renders the row as `{'id': '1', 'name': 'D'}` for error messages.
impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", quoted(name), quoted(value))?;
        }
        f.write_str("}")
    }
}

fn quoted(s: &str) -> String {
    // Prefer single quotes; switch to double quotes only when that avoids escaping.
    let quote = if s.contains('\'') && !s.contains('"') {
        '"'
    } else {
        '\''
    };
    let mut out = String::with_capacity(s.len() + 2);
    out.push(quote);
    for c in s.chars() {
        if c == '\\' || c == quote {
            out.push('\\');
        }
        out.push(c);
    }
    out.push(quote);
    out
}

/// A fully decoded CSV file.
#[derive(Debug, Clone)]
pub struct Table {
    pub path: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Row>,
}

impl Table {
    /// Checks that every column in `required` is present in the header.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError::MissingColumn`] naming the first absent column.
    pub fn validate_columns(&self, required: &[&str]) -> Result<()> {
        for column in required {
            if !self.headers.iter().any(|h| h == column) {
                return Err(ReportError::MissingColumn {
                    path: self.path.clone(),
                    column: column.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Reads the CSV file at `path` into a [`Table`], trimming headers and values.
///
/// A file with a header row and no data rows decodes to an empty table.
///
/// # Errors
///
/// - [`ReportError::FileUnreadable`] if the file cannot be opened.
/// - [`ReportError::EmptyInput`] if the file has no header row.
/// - [`ReportError::MalformedCsv`] if a record cannot be parsed (for example a
///   row with a different number of fields than the header).
pub fn decode(path: impl AsRef<Path>) -> Result<Table> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ReportError::FileUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |source: csv::Error| ReportError::MalformedCsv {
        path: path.to_path_buf(),
        source,
    };

    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(file);

    let headers: Vec<String> = rdr
        .headers()
        .map_err(malformed)?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(String::is_empty) {
        return Err(ReportError::EmptyInput {
            path: path.to_path_buf(),
        });
    }

    let mut rows = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(malformed)?;
        let fields = headers
            .iter()
            .cloned()
            .zip(record.iter().map(str::to_string))
            .collect();
        rows.push(Row::new(fields));
    }

    debug!(path = %path.display(), rows = rows.len(), "Decoded CSV file");

    Ok(Table {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}
