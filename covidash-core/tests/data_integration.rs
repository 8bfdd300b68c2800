//! Integration tests for the load → view pipeline using the frozen CSV fixtures.

use chrono::NaiveDate;
use covidash_core::data::{DataError, LoadOptions, Loader, SourceConfig, TableKind, TableSource};
use covidash_core::quality::MissingReport;
use covidash_core::views::{rank, top_deaths, totals, trend, Selection, ViewError};
use covidash_core::{entities, load};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

fn fixture_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn copy_fixtures_to(dir: &Path) {
    for kind in [TableKind::Primary, TableKind::Summary] {
        fs::copy(
            fixture_dir().join(kind.file_name()),
            dir.join(kind.file_name()),
        )
        .unwrap();
    }
}

fn jan(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, day).unwrap()
}

#[test]
fn local_fixture_loads_both_tables() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();

    assert_eq!(ds.primary.len(), 15);
    assert_eq!(ds.summary.len(), 7);
    assert!(ds.primary.has_column("province"));
    assert!(ds.summary.has_column("total_tests"));

    let hubei = &ds.primary.rows()[3];
    assert_eq!(hubei.entity, "China");
    assert_eq!(hubei.province.as_deref(), Some("Hubei"));
    assert_eq!(hubei.date, jan(22));
    assert_eq!(hubei.confirmed, 444.0);
}

#[test]
fn loading_twice_yields_equal_tables() {
    let config = SourceConfig::local(fixture_dir());
    let first = load(&config).unwrap();
    let second = load(&config).unwrap();

    assert_eq!(first.primary.len(), second.primary.len());
    assert_eq!(first.summary.columns(), second.summary.columns());
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
}

#[test]
fn memoized_load_does_not_touch_the_source_again() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures_to(dir.path());

    let loader = Loader::new(&LoadOptions::default());
    let config = SourceConfig::local(dir.path());
    let first = loader.load(&config).unwrap();

    // With the files gone, only the cache can satisfy the second call.
    for kind in [TableKind::Primary, TableKind::Summary] {
        fs::remove_file(dir.path().join(kind.file_name())).unwrap();
    }
    let second = loader.load(&config).unwrap();
    assert!(Arc::ptr_eq(&first, &second));

    loader.cache().invalidate(&config);
    let err = loader.load(&config).unwrap_err();
    assert!(matches!(err, DataError::SourceUnavailable { .. }));
}

#[test]
fn missing_file_is_source_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    fs::copy(
        fixture_dir().join(TableKind::Primary.file_name()),
        dir.path().join(TableKind::Primary.file_name()),
    )
    .unwrap();

    let err = load(&SourceConfig::local(dir.path())).unwrap_err();
    match err {
        DataError::SourceUnavailable { reason, .. } => {
            assert!(reason.contains("worldometer_data.csv"), "reason: {reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_required_column_is_schema_mismatch() {
    let dir = tempfile::tempdir().unwrap();
    copy_fixtures_to(dir.path());
    fs::write(
        dir.path().join(TableKind::Summary.file_name()),
        "Country/Region,Population,TotalCases,TotalRecovered,ActiveCases\nUSA,1,2,3,4\n",
    )
    .unwrap();

    let err = load(&SourceConfig::local(dir.path())).unwrap_err();
    match err {
        DataError::SchemaMismatch { table, column } => {
            assert_eq!(table, TableKind::Summary);
            assert_eq!(column, "total_deaths");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn global_trend_sums_every_country_per_date() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();
    let series = trend(&ds.primary, &Selection::All).unwrap();

    assert_eq!(series.len(), 3);
    let dates: Vec<_> = series.iter().map(|p| p.date).collect();
    assert_eq!(dates, vec![jan(22), jan(23), jan(24)]);

    let last = series.rows()[2];
    assert_eq!(last.confirmed, 566.0);
    assert_eq!(last.deaths, 24.0);
    assert_eq!(last.recovered, 31.0);
    assert_eq!(last.active, 511.0);

    assert_eq!(series.rows()[0].confirmed, 446.0);
    assert_eq!(series.rows()[1].active, 409.0);
}

#[test]
fn country_trend_keeps_province_rows_in_order() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();
    let series = trend(&ds.primary, &Selection::entity("China")).unwrap();

    let confirmed: Vec<_> = series.iter().map(|p| p.confirmed).collect();
    assert_eq!(confirmed, vec![1.0, 444.0, 9.0, 444.0, 15.0, 549.0]);
}

#[test]
fn unknown_country_trend_fails() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();
    let err = trend(&ds.primary, &Selection::entity("Atlantis")).unwrap_err();
    assert_eq!(
        err,
        ViewError::UnknownEntity {
            entity: "Atlantis".into()
        }
    );
}

#[test]
fn deaths_ranking_over_fixture() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();
    let ranked = rank(&ds.summary, "total_deaths", 15).unwrap();

    assert_eq!(ranked.len(), 7);
    let names: Vec<_> = ranked.iter().map(|r| r.entity.as_str()).collect();
    assert_eq!(
        names,
        vec!["USA", "Brazil", "UK", "India", "China", "Afghanistan", "Albania"]
    );
    for pair in ranked.rows().windows(2) {
        assert!(pair[0].total_deaths >= pair[1].total_deaths);
    }

    assert_eq!(top_deaths(&ds.summary, 3).unwrap().len(), 3);
}

#[test]
fn totals_over_fixture() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();

    let global = totals(&ds.summary, &Selection::All).unwrap();
    assert_eq!(global.total_cases, Some(10_409_525.0));
    assert_eq!(global.total_deaths, Some(355_586.0));
    assert_eq!(global.total_recovered, Some(6_109_479.0));

    let uk = totals(&ds.summary, &Selection::entity("UK")).unwrap();
    assert_eq!(uk.total_cases, Some(308_134.0));
    assert_eq!(uk.total_recovered, None);

    // The time series says "US", the snapshot says "USA".
    assert!(matches!(
        totals(&ds.summary, &Selection::entity("US")),
        Err(ViewError::UnknownEntity { .. })
    ));
}

#[test]
fn entity_picker_lists_primary_countries() {
    let ds = load(&SourceConfig::local(fixture_dir())).unwrap();
    assert_eq!(
        entities(&ds.primary),
        vec!["Afghanistan", "Albania", "China", "US"]
    );
}

#[test]
fn missing_report_over_fixture_snapshot() {
    let source = covidash_core::data::LocalDirectory::new(fixture_dir());
    let raw = source.fetch(TableKind::Summary).unwrap();
    let report = MissingReport::from_raw(&raw).unwrap();

    assert_eq!(report.rows, 7);
    let missing = |name: &str| {
        report
            .columns
            .iter()
            .find(|c| c.column == name)
            .map(|c| c.missing)
            .unwrap()
    };
    assert_eq!(missing("NewCases"), 7);
    assert_eq!(missing("TotalRecovered"), 1);
    assert_eq!(missing("Serious,Critical"), 1);
    assert_eq!(missing("TotalTests"), 1);
    assert_eq!(missing("Country/Region"), 0);
}
