use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DeckError, Result};

/// Column names in file order plus a name → position lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

impl Header {
    /// When a name repeats, lookups resolve to its last occurrence.
    pub fn new(columns: Vec<String>) -> Self {
        let index = columns
            .iter()
            .enumerate()
            .map(|(pos, name)| (name.clone(), pos))
            .collect();
        Self { columns, index }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        self.index.get(column).copied()
    }

    pub fn contains(&self, column: &str) -> bool {
        self.index.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// One parsed input row, keyed by the shared header
#[derive(Debug, Clone)]
pub struct Record {
    header: Arc<Header>,
    values: Vec<String>,
    /// 1-based line in the source file
    pub line: u64,
}

impl Record {
    pub fn new(header: Arc<Header>, values: Vec<String>, line: u64) -> Self {
        Self {
            header,
            values,
            line,
        }
    }

    /// Cell value for `column`, or `None` when the column is unknown or the
    /// row is too short to reach it
    pub fn get(&self, column: &str) -> Option<&str> {
        self.header
            .position(column)
            .and_then(|pos| self.values.get(pos))
            .map(String::as_str)
    }

    /// Like [`Record::get`] but reports the row's line on failure
    pub fn require(&self, column: &str) -> Result<&str> {
        self.get(column).ok_or_else(|| DeckError::MissingColumn {
            column: column.to_string(),
            line: Some(self.line),
        })
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Header plus every record of an input file, in file order
#[derive(Debug, Clone)]
pub struct Table {
    pub header: Arc<Header>,
    pub records: Vec<Record>,
}

impl Table {
    /// Fail fast when any of `columns` is absent from the header
    pub fn require_columns(&self, columns: &[&str]) -> Result<()> {
        match columns.iter().find(|c| !self.header.contains(c)) {
            Some(missing) => Err(DeckError::MissingColumn {
                column: missing.to_string(),
                line: None,
            }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
