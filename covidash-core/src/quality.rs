//! Missing-value report over raw tables.
//!
//! Works on the delimited text rather than the typed rows so that every
//! column is covered, including the ones ingest does not keep (coordinates,
//! per-million ratios, ...).

use crate::data::{DataError, RawTable, TableKind};
use serde::Serialize;

/// Blank-cell count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnMissing {
    pub column: String,
    pub missing: usize,
}

/// Per-column blank-cell counts for one raw table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingReport {
    pub table: TableKind,
    pub rows: usize,
    pub columns: Vec<ColumnMissing>,
}

impl MissingReport {
    /// Count blank cells per header column.
    ///
    /// A cell is blank when it is empty after trimming or reads `NaN`. Short
    /// records count their absent trailing cells as blank.
    pub fn from_raw(raw: &RawTable) -> Result<Self, DataError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(raw.text.as_bytes());

        let malformed = |line: u64, e: csv::Error| DataError::MalformedRecord {
            table: raw.kind,
            line,
            reason: e.to_string(),
        };

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| malformed(1, e))?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut missing = vec![0usize; headers.len()];
        let mut rows = 0;
        for result in reader.records() {
            let record = result.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or(0);
                malformed(line, e)
            })?;
            rows += 1;
            for (i, count) in missing.iter_mut().enumerate() {
                if record.get(i).map_or(true, is_blank) {
                    *count += 1;
                }
            }
        }

        let columns = headers
            .into_iter()
            .zip(missing)
            .map(|(column, missing)| ColumnMissing { column, missing })
            .collect();

        Ok(Self {
            table: raw.kind,
            rows,
            columns,
        })
    }

    /// Columns with at least one blank cell.
    pub fn incomplete_columns(&self) -> impl Iterator<Item = &ColumnMissing> {
        self.columns.iter().filter(|c| c.missing > 0)
    }

    pub fn total_missing(&self) -> usize {
        self.columns.iter().map(|c| c.missing).sum()
    }
}

fn is_blank(cell: &str) -> bool {
    let cell = cell.trim();
    cell.is_empty() || cell.eq_ignore_ascii_case("nan")
}
