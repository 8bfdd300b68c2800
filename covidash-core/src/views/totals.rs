//! Scalar totals behind the metric cards.

use super::{Selection, ViewError};
use crate::data::{SnapshotRecord, Table};
use serde::Serialize;

/// Cases, deaths and recoveries for the current selection.
///
/// A field is `None` only for a single entity whose snapshot cell is blank.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Totals {
    pub total_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub total_recovered: Option<f64>,
}

impl From<&SnapshotRecord> for Totals {
    fn from(rec: &SnapshotRecord) -> Self {
        Self {
            total_cases: rec.total_cases,
            total_deaths: rec.total_deaths,
            total_recovered: rec.total_recovered,
        }
    }
}

/// Metric-card totals.
///
/// - `All`: column-wise sums over every snapshot row; blank cells are skipped.
/// - `Entity(name)`: the entity's own row. Zero matches is `UnknownEntity`;
///   more than one is `AmbiguousEntity` rather than silently picking one.
pub fn totals(summary: &Table<SnapshotRecord>, selection: &Selection) -> Result<Totals, ViewError> {
    match selection {
        Selection::All => Ok(Totals {
            total_cases: Some(column_sum(summary, |r| r.total_cases)),
            total_deaths: Some(column_sum(summary, |r| r.total_deaths)),
            total_recovered: Some(column_sum(summary, |r| r.total_recovered)),
        }),
        Selection::Entity(name) => {
            let mut matches = summary.iter().filter(|r| r.entity == *name);
            let first = matches.next().ok_or_else(|| ViewError::UnknownEntity {
                entity: name.clone(),
            })?;
            let extra = matches.count();
            if extra > 0 {
                return Err(ViewError::AmbiguousEntity {
                    entity: name.clone(),
                    matches: extra + 1,
                });
            }
            Ok(Totals::from(first))
        }
    }
}

fn column_sum(summary: &Table<SnapshotRecord>, field: impl Fn(&SnapshotRecord) -> Option<f64>) -> f64 {
    summary.iter().filter_map(field).sum()
}
