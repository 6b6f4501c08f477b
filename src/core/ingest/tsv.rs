//! Tab-separated export reader.
//!
//! Exports carry a header row of index field names, one record per
//! line and no quoting. Columns ending in `_ss` or `_sm` hold several
//! values joined with `|`.

use crate::core::error::{Result, VitrineError};
use crate::core::types::RawDocument;
use serde_json::Value;
use std::fs::File;
use std::io::Read;
use std::path::Path;

const MULTI_VALUE_SUFFIXES: [&str; 2] = ["_ss", "_sm"];
const MULTI_VALUE_SEPARATOR: char = '|';

/// One data row of an export
#[derive(Debug, Clone, PartialEq)]
pub enum TsvRow {
    Record(RawDocument),
    /// Row that cannot become a record; `line` is 1-based
    Skipped { line: u64, reason: String },
}

pub fn is_multi_valued(column: &str) -> bool {
    MULTI_VALUE_SUFFIXES.iter().any(|s| column.ends_with(s))
}

/// Streaming reader over an export
pub struct TsvReader<R: Read> {
    records: csv::StringRecordsIntoIter<R>,
    headers: Vec<String>,
    id_column: String,
}

impl TsvReader<File> {
    pub fn open(path: &Path, id_column: &str) -> Result<Self> {
        let file = File::open(path).map_err(|e| {
            VitrineError::IngestFailed(format!("Failed to open {}: {e}", path.display()))
        })?;
        Self::from_reader(file, id_column)
    }
}

impl<R: Read> TsvReader<R> {
    /// Read the header row and prepare to stream records
    ///
    /// # Errors
    ///
    /// `IngestFailed` when the header is missing, repeats a column or
    /// lacks the id column.
    pub fn from_reader(reader: R, id_column: &str) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .quoting(false)
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(VitrineError::IngestFailed(
                "Export has no header row".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = headers.iter().find(|h| !h.is_empty() && !seen.insert(*h)) {
            return Err(VitrineError::IngestFailed(format!(
                "Column '{dup}' appears more than once"
            )));
        }

        if !headers.iter().any(|h| h == id_column) {
            return Err(VitrineError::IngestFailed(format!(
                "Export has no '{id_column}' column"
            )));
        }

        Ok(Self {
            records: reader.into_records(),
            headers,
            id_column: id_column.to_string(),
        })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn to_row(&self, record: &csv::StringRecord) -> TsvRow {
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        if record.len() != self.headers.len() {
            return TsvRow::Skipped {
                line,
                reason: format!(
                    "expected {} columns, found {}",
                    self.headers.len(),
                    record.len()
                ),
            };
        }

        let mut doc = RawDocument::new();
        for (column, cell) in self.headers.iter().zip(record.iter()) {
            let cell = cell.trim();
            if column.is_empty() || cell.is_empty() {
                continue;
            }

            let value = if is_multi_valued(column) {
                let values: Vec<Value> = cell
                    .split(MULTI_VALUE_SEPARATOR)
                    .map(str::trim)
                    .filter(|v| !v.is_empty())
                    .map(|v| Value::String(v.to_string()))
                    .collect();
                if values.is_empty() {
                    continue;
                }
                Value::Array(values)
            } else {
                Value::String(cell.to_string())
            };

            doc.insert(column.clone(), value);
        }

        if !doc.contains_key(&self.id_column) {
            return TsvRow::Skipped {
                line,
                reason: format!("no '{}' value", self.id_column),
            };
        }

        TsvRow::Record(doc)
    }
}

impl<R: Read> Iterator for TsvReader<R> {
    type Item = Result<TsvRow>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(
            record
                .map(|r| self.to_row(&r))
                .map_err(VitrineError::from),
        )
    }
}
