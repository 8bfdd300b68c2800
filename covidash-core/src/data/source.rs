//! Source configuration: which spreadsheets or which directory to load from.
//!
//! `SourceConfig` is also the memoization key, so it derives `Hash + Eq` and
//! compares by value.

use super::local::LocalDirectory;
use super::provider::{TableKind, TableSource};
use super::sheets::SheetsExport;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

const EXPORT_BASE: &str = "https://docs.google.com/spreadsheets/d";

/// One sheet of a published spreadsheet document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SheetRef {
    pub document_id: String,
    pub sheet_id: String,
}

impl SheetRef {
    pub fn new(document_id: impl Into<String>, sheet_id: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            sheet_id: sheet_id.into(),
        }
    }

    /// CSV export URL for this sheet.
    pub fn export_url(&self) -> String {
        format!(
            "{EXPORT_BASE}/{}/export?format=csv&gid={}",
            self.document_id, self.sheet_id
        )
    }
}

/// Where the two tables are loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SourceConfig {
    /// Two published spreadsheets, fetched over HTTP as CSV exports.
    Remote { primary: SheetRef, summary: SheetRef },
    /// A directory holding `covid_19_clean_complete.csv` and `worldometer_data.csv`.
    Local { base_dir: PathBuf },
}

impl SourceConfig {
    /// The published "clean complete" and "worldometer" spreadsheets.
    pub fn default_remote() -> Self {
        SourceConfig::Remote {
            primary: SheetRef::new("1xS796WDWsalAFcMClLNVtr8DUsuVZqjGuQ3HsAJ8OHA", "1327158710"),
            summary: SheetRef::new("1XBu5i_5EioZX-pHRhAX90DQEZy2e2-XgtulEZIGLEao", "0"),
        }
    }

    pub fn local(base_dir: impl Into<PathBuf>) -> Self {
        SourceConfig::Local {
            base_dir: base_dir.into(),
        }
    }

    /// Sheet reference for a table, for remote configs.
    pub fn sheet(&self, kind: TableKind) -> Option<&SheetRef> {
        match self {
            SourceConfig::Remote { primary, summary } => Some(match kind {
                TableKind::Primary => primary,
                TableKind::Summary => summary,
            }),
            SourceConfig::Local { .. } => None,
        }
    }

    /// Build the concrete source for this config.
    pub fn open(&self, timeout: Duration) -> Result<Box<dyn TableSource>, super::DataError> {
        match self {
            SourceConfig::Remote { primary, summary } => Ok(Box::new(SheetsExport::new(
                primary.clone(),
                summary.clone(),
                timeout,
            )?)),
            SourceConfig::Local { base_dir } => Ok(Box::new(LocalDirectory::new(base_dir.clone()))),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self::default_remote()
    }
}
