//! Trend series behind the cases line chart.

use super::{Selection, ViewError};
use crate::data::{CaseRecord, Table, TrendPoint};
use std::collections::BTreeMap;

/// Time series of the four case metrics for a selection.
///
/// - `All`: one point per distinct date, each metric summed over every row
///   sharing that date, ascending by date.
/// - `Entity(name)`: the entity's rows in source order, unaggregated. An
///   entity reported per province therefore yields several points per date.
///
/// Fails with `UnknownEntity` when the named entity has no rows.
pub fn trend(
    primary: &Table<CaseRecord>,
    selection: &Selection,
) -> Result<Table<TrendPoint>, ViewError> {
    let points = match selection {
        Selection::All => sum_by_date(primary),
        Selection::Entity(name) => {
            let points: Vec<TrendPoint> = primary
                .iter()
                .filter(|rec| rec.entity == *name)
                .map(TrendPoint::from)
                .collect();
            if points.is_empty() {
                return Err(ViewError::UnknownEntity {
                    entity: name.clone(),
                });
            }
            points
        }
    };

    Ok(Table::new(TrendPoint::COLUMNS.to_vec(), points))
}

fn sum_by_date(primary: &Table<CaseRecord>) -> Vec<TrendPoint> {
    let mut by_date: BTreeMap<_, TrendPoint> = BTreeMap::new();
    for rec in primary {
        by_date
            .entry(rec.date)
            .or_insert_with(|| TrendPoint::zero(rec.date))
            .accumulate(rec);
    }
    by_date.into_values().collect()
}
