//! Table source trait and structured error types.
//!
//! The TableSource trait abstracts over where the delimited text comes from
//! (spreadsheet export, local directory) so we can swap implementations and
//! feed in-memory text in tests.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which of the two datasets a table belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// Per-country time series (`covid_19_clean_complete`).
    Primary,
    /// Latest per-country snapshot (`worldometer_data`).
    Summary,
}

impl TableKind {
    /// Fixed filename of this table inside a local data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            TableKind::Primary => "covid_19_clean_complete.csv",
            TableKind::Summary => "worldometer_data.csv",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TableKind::Primary => "primary",
            TableKind::Summary => "summary",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Structured error types for loading operations.
///
/// These are designed to be displayable in CLI output as-is.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("source unavailable ({source_name}): {reason}")]
    SourceUnavailable { source_name: String, reason: String },

    #[error("schema mismatch in {table} table: missing required column '{column}'")]
    SchemaMismatch { table: TableKind, column: String },

    #[error("malformed record in {table} table at line {line}: {reason}")]
    MalformedRecord {
        table: TableKind,
        line: u64,
        reason: String,
    },
}

impl DataError {
    pub(crate) fn unavailable(source_name: &str, reason: impl Into<String>) -> Self {
        DataError::SourceUnavailable {
            source_name: source_name.to_string(),
            reason: reason.into(),
        }
    }
}

/// Where a raw table came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataOrigin {
    SheetsExport,
    LocalFile,
    InMemory,
}

/// Delimited text fetched from a source, before parsing.
#[derive(Debug, Clone)]
pub struct RawTable {
    pub kind: TableKind,
    pub origin: DataOrigin,
    /// URL or file path the text was read from.
    pub location: String,
    pub text: String,
}

/// Trait for table sources (spreadsheet export, local files, fixtures).
///
/// Implementations only retrieve text. Parsing and memoization sit above
/// this trait; sources don't know about either.
pub trait TableSource: Send + Sync {
    /// Human-readable name of this source, used in errors and logs.
    fn name(&self) -> &str;

    /// Retrieve the delimited text for one of the two tables.
    fn fetch(&self, kind: TableKind) -> Result<RawTable, DataError>;
}

/// Source backed by strings held in memory. Handy for tests and for callers
/// that already have the text.
#[derive(Debug, Clone)]
pub struct InMemorySource {
    pub primary: String,
    pub summary: String,
}

impl InMemorySource {
    pub fn new(primary: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            summary: summary.into(),
        }
    }
}

impl TableSource for InMemorySource {
    fn name(&self) -> &str {
        "in_memory"
    }

    fn fetch(&self, kind: TableKind) -> Result<RawTable, DataError> {
        let text = match kind {
            TableKind::Primary => self.primary.clone(),
            TableKind::Summary => self.summary.clone(),
        };
        Ok(RawTable {
            kind,
            origin: DataOrigin::InMemory,
            location: format!("memory:{kind}"),
            text,
        })
    }
}
