//! Snapshot rankings: the "latest snapshot" table and the top-deaths bar chart.

use super::ViewError;
use crate::data::{SnapshotRecord, SummaryMetric, Table};
use std::cmp::Ordering;

/// Rows shown in the latest-snapshot table.
pub const DEFAULT_SNAPSHOT_TOP_N: usize = 20;

/// Bars shown in the deaths chart.
pub const DEFAULT_DEATHS_TOP_N: usize = 15;

/// Top `top_n` snapshot rows by the metric named `metric`.
///
/// `metric` may be the canonical column name (`total_deaths`) or the
/// published header (`TotalDeaths`).
pub fn rank(
    summary: &Table<SnapshotRecord>,
    metric: &str,
    top_n: usize,
) -> Result<Table<SnapshotRecord>, ViewError> {
    let metric: SummaryMetric = metric
        .parse()
        .map_err(|metric| ViewError::UnknownMetric { metric })?;
    rank_by(summary, metric, top_n)
}

/// Top `top_n` snapshot rows, descending by `metric`.
///
/// The sort is stable, so rows with equal values keep their source order.
/// Blank cells sort after every value. Fails with `UnknownMetric` when the
/// loaded table does not carry the metric's column.
pub fn rank_by(
    summary: &Table<SnapshotRecord>,
    metric: SummaryMetric,
    top_n: usize,
) -> Result<Table<SnapshotRecord>, ViewError> {
    if !summary.has_column(metric.column()) {
        return Err(ViewError::UnknownMetric {
            metric: metric.column().to_string(),
        });
    }

    let mut rows = summary.rows().to_vec();
    rows.sort_by(|a, b| descending(a.metric(metric), b.metric(metric)));
    rows.truncate(top_n);

    Ok(Table::new(summary.columns().to_vec(), rows))
}

/// Snapshot table: top rows by total cases.
pub fn latest_snapshot(
    summary: &Table<SnapshotRecord>,
    top_n: usize,
) -> Result<Table<SnapshotRecord>, ViewError> {
    rank_by(summary, SummaryMetric::TotalCases, top_n)
}

/// Deaths chart: top rows by total deaths.
pub fn top_deaths(
    summary: &Table<SnapshotRecord>,
    top_n: usize,
) -> Result<Table<SnapshotRecord>, ViewError> {
    rank_by(summary, SummaryMetric::TotalDeaths, top_n)
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(rows: &[(&str, Option<f64>)]) -> Table<SnapshotRecord> {
        let rows = rows
            .iter()
            .map(|(entity, deaths)| {
                let mut rec = SnapshotRecord::new(*entity);
                rec.total_deaths = *deaths;
                rec.total_cases = deaths.map(|d| d * 20.0);
                rec
            })
            .collect();
        Table::new(
            vec![
                "entity",
                "population",
                "total_cases",
                "total_deaths",
                "total_recovered",
                "active_cases",
            ],
            rows,
        )
    }

    fn names(table: &Table<SnapshotRecord>) -> Vec<&str> {
        table.iter().map(|r| r.entity.as_str()).collect()
    }

    #[test]
    fn sorts_descending_and_truncates() {
        let table = summary(&[
            ("A", Some(5.0)),
            ("B", Some(50.0)),
            ("C", Some(20.0)),
            ("D", Some(1.0)),
        ]);
        let ranked = rank(&table, "total_deaths", 2).unwrap();
        assert_eq!(names(&ranked), vec!["B", "C"]);
    }

    #[test]
    fn fewer_rows_than_requested_returns_all() {
        let table = summary(&[("A", Some(1.0)), ("B", Some(3.0)), ("C", Some(2.0))]);
        let ranked = rank(&table, "total_deaths", 15).unwrap();
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
    }

    #[test]
    fn ties_keep_source_order() {
        let table = summary(&[("A", Some(7.0)), ("B", Some(9.0)), ("C", Some(7.0))]);
        let ranked = rank(&table, "TotalDeaths", 3).unwrap();
        assert_eq!(names(&ranked), vec!["B", "A", "C"]);
    }

    #[test]
    fn blanks_sort_last() {
        let table = summary(&[("A", None), ("B", Some(0.0)), ("C", Some(4.0))]);
        let ranked = rank(&table, "total_deaths", 3).unwrap();
        assert_eq!(names(&ranked), vec!["C", "B", "A"]);
    }

    #[test]
    fn zero_top_n_is_empty() {
        let table = summary(&[("A", Some(1.0))]);
        assert!(rank(&table, "total_deaths", 0).unwrap().is_empty());
    }

    #[test]
    fn unknown_metric_name() {
        let table = summary(&[("A", Some(1.0))]);
        assert_eq!(
            rank(&table, "entity", 5).unwrap_err(),
            ViewError::UnknownMetric {
                metric: "entity".into()
            }
        );
    }

    #[test]
    fn metric_missing_from_loaded_table() {
        let table = summary(&[("A", Some(1.0))]);
        let err = rank_by(&table, SummaryMetric::TotalTests, 5).unwrap_err();
        assert_eq!(
            err,
            ViewError::UnknownMetric {
                metric: "total_tests".into()
            }
        );
    }

    #[test]
    fn fixed_views_rank_by_their_metric() {
        let table = summary(&[("A", Some(1.0)), ("B", Some(2.0))]);
        assert_eq!(names(&top_deaths(&table, DEFAULT_DEATHS_TOP_N).unwrap()), vec!["B", "A"]);
        assert_eq!(
            names(&latest_snapshot(&table, DEFAULT_SNAPSHOT_TOP_N).unwrap()),
            vec!["B", "A"]
        );
    }

    #[test]
    fn source_table_is_untouched() {
        let table = summary(&[("A", Some(1.0)), ("B", Some(2.0))]);
        let before = table.clone();
        let _ = rank(&table, "total_deaths", 1).unwrap();
        assert_eq!(table, before);
    }
}
