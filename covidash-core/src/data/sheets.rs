//! Spreadsheet CSV export source.
//!
//! Fetches each table from the document's `export?format=csv` endpoint with a
//! blocking client. There is no retry: a failed request is reported as
//! `SourceUnavailable` and the caller decides what to do next.

use super::provider::{DataError, DataOrigin, RawTable, TableKind, TableSource};
use super::source::SheetRef;
use std::time::Duration;
use tracing::debug;

/// Remote source reading two published spreadsheets.
pub struct SheetsExport {
    client: reqwest::blocking::Client,
    primary: SheetRef,
    summary: SheetRef,
}

impl SheetsExport {
    pub fn new(primary: SheetRef, summary: SheetRef, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::unavailable("sheets_export", format!("http client: {e}")))?;

        Ok(Self::with_client(client, primary, summary))
    }

    /// Use an already configured client (proxy, TLS, timeout settings).
    pub fn with_client(
        client: reqwest::blocking::Client,
        primary: SheetRef,
        summary: SheetRef,
    ) -> Self {
        Self {
            client,
            primary,
            summary,
        }
    }

    fn sheet(&self, kind: TableKind) -> &SheetRef {
        match kind {
            TableKind::Primary => &self.primary,
            TableKind::Summary => &self.summary,
        }
    }

    fn get_text(&self, url: &str) -> Result<String, DataError> {
        debug!(%url, "fetching sheet export");

        let resp = self.client.get(url).send().map_err(|e| {
            let reason = if e.is_timeout() {
                format!("request to {url} timed out")
            } else {
                format!("GET {url} failed: {e}")
            };
            DataError::unavailable(self.name(), reason)
        })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::unavailable(
                self.name(),
                format!("HTTP {status} for {url}"),
            ));
        }

        resp.text()
            .map_err(|e| DataError::unavailable(self.name(), format!("reading body of {url}: {e}")))
    }
}

impl TableSource for SheetsExport {
    fn name(&self) -> &str {
        "sheets_export"
    }

    fn fetch(&self, kind: TableKind) -> Result<RawTable, DataError> {
        let url = self.sheet(kind).export_url();
        let text = self.get_text(&url)?;
        Ok(RawTable {
            kind,
            origin: DataOrigin::SheetsExport,
            location: url,
            text,
        })
    }
}
