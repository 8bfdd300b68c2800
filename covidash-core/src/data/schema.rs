//! Column schemas for the two tables and header resolution.
//!
//! Every canonical column accepts either its snake_case name or the header
//! used by the published datasets (`Country/Region`, `TotalCases`, ...).
//! Headers are resolved once per table, before any row is parsed, so a
//! missing required column fails the load eagerly.

use super::provider::{DataError, TableKind};
use csv::StringRecord;

/// One column of a table schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    /// Canonical snake_case name.
    pub name: &'static str,
    /// Header in the published datasets.
    pub header: &'static str,
    pub required: bool,
}

impl ColumnSpec {
    const fn required(name: &'static str, header: &'static str) -> Self {
        Self {
            name,
            header,
            required: true,
        }
    }

    const fn optional(name: &'static str, header: &'static str) -> Self {
        Self {
            name,
            header,
            required: false,
        }
    }

    fn matches(&self, header: &str) -> bool {
        header == self.name || header == self.header
    }
}

const PRIMARY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::optional("province", "Province/State"),
    ColumnSpec::required("entity", "Country/Region"),
    ColumnSpec::required("date", "Date"),
    ColumnSpec::required("confirmed", "Confirmed"),
    ColumnSpec::required("deaths", "Deaths"),
    ColumnSpec::required("recovered", "Recovered"),
    ColumnSpec::required("active", "Active"),
    ColumnSpec::optional("who_region", "WHO Region"),
];

const SUMMARY_COLUMNS: &[ColumnSpec] = &[
    ColumnSpec::required("entity", "Country/Region"),
    ColumnSpec::optional("continent", "Continent"),
    ColumnSpec::required("population", "Population"),
    ColumnSpec::required("total_cases", "TotalCases"),
    ColumnSpec::optional("new_cases", "NewCases"),
    ColumnSpec::required("total_deaths", "TotalDeaths"),
    ColumnSpec::optional("new_deaths", "NewDeaths"),
    ColumnSpec::required("total_recovered", "TotalRecovered"),
    ColumnSpec::required("active_cases", "ActiveCases"),
    ColumnSpec::optional("serious_critical", "Serious,Critical"),
    ColumnSpec::optional("total_tests", "TotalTests"),
    ColumnSpec::optional("who_region", "WHO Region"),
];

/// Expected columns of one table.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub kind: TableKind,
    pub columns: &'static [ColumnSpec],
}

impl TableSchema {
    pub fn for_kind(kind: TableKind) -> Self {
        let columns = match kind {
            TableKind::Primary => PRIMARY_COLUMNS,
            TableKind::Summary => SUMMARY_COLUMNS,
        };
        Self { kind, columns }
    }

    pub fn primary() -> Self {
        Self::for_kind(TableKind::Primary)
    }

    pub fn summary() -> Self {
        Self::for_kind(TableKind::Summary)
    }

    pub fn required_columns(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().filter(|c| c.required).map(|c| c.name)
    }

    /// Map the header row onto this schema.
    ///
    /// Fails with `SchemaMismatch` naming the first required column that no
    /// header matches. Unknown headers are ignored.
    pub fn resolve(&self, headers: &StringRecord) -> Result<ColumnIndex, DataError> {
        let cleaned: Vec<&str> = headers
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim())
            .collect();

        let mut positions = Vec::with_capacity(self.columns.len());
        for spec in self.columns {
            let pos = cleaned.iter().position(|h| spec.matches(h));
            if pos.is_none() && spec.required {
                return Err(DataError::SchemaMismatch {
                    table: self.kind,
                    column: spec.name.to_string(),
                });
            }
            positions.push(pos);
        }

        Ok(ColumnIndex {
            schema: *self,
            positions,
        })
    }
}

/// Resolved positions of schema columns within a header row.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    schema: TableSchema,
    positions: Vec<Option<usize>>,
}

impl ColumnIndex {
    /// Position of a canonical column in each record, if the header was present.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.schema
            .columns
            .iter()
            .zip(&self.positions)
            .find(|(spec, _)| spec.name == name)
            .and_then(|(_, pos)| *pos)
    }

    /// Canonical names of the columns present in the source, in schema order.
    pub fn present(&self) -> Vec<&'static str> {
        self.schema
            .columns
            .iter()
            .zip(&self.positions)
            .filter(|(_, pos)| pos.is_some())
            .map(|(spec, _)| spec.name)
            .collect()
    }
}
