//! Entity list behind the country picker.

use crate::data::{CaseRecord, Table};
use std::collections::BTreeSet;

/// Distinct entity names of the time-series table, sorted. This is the list
/// the country picker offers after the `Global` entry.
pub fn entities(primary: &Table<CaseRecord>) -> Vec<String> {
    primary
        .iter()
        .map(|rec| rec.entity.as_str())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn sorted_and_distinct() {
        let date = NaiveDate::from_ymd_opt(2020, 5, 1).unwrap();
        let rows = ["Zambia", "Albania", "Zambia", "Chile"]
            .into_iter()
            .map(|entity| CaseRecord {
                entity: entity.into(),
                province: None,
                date,
                confirmed: 1.0,
                deaths: 0.0,
                recovered: 0.0,
                active: 1.0,
                who_region: None,
            })
            .collect();
        let table = Table::new(vec!["entity"], rows);
        assert_eq!(entities(&table), vec!["Albania", "Chile", "Zambia"]);
    }
}
