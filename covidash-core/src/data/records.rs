//! Typed rows of the two source tables and of the derived trend series.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the time-series table: an entity's counts on one date.
///
/// Entities with provinces have several rows per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub entity: String,
    pub province: Option<String>,
    pub date: NaiveDate,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub active: f64,
    pub who_region: Option<String>,
}

/// One row of the snapshot table: latest figures for one entity.
///
/// Numeric cells are optional because the published snapshot leaves some
/// of them blank (e.g. recoveries for countries that stopped reporting).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRecord {
    pub entity: String,
    pub continent: Option<String>,
    pub population: Option<f64>,
    pub total_cases: Option<f64>,
    pub new_cases: Option<f64>,
    pub total_deaths: Option<f64>,
    pub new_deaths: Option<f64>,
    pub total_recovered: Option<f64>,
    pub active_cases: Option<f64>,
    pub serious_critical: Option<f64>,
    pub total_tests: Option<f64>,
    pub who_region: Option<String>,
}

impl SnapshotRecord {
    /// Empty record for `entity`; every figure blank.
    pub fn new(entity: impl Into<String>) -> Self {
        Self {
            entity: entity.into(),
            continent: None,
            population: None,
            total_cases: None,
            new_cases: None,
            total_deaths: None,
            new_deaths: None,
            total_recovered: None,
            active_cases: None,
            serious_critical: None,
            total_tests: None,
            who_region: None,
        }
    }

    pub fn metric(&self, metric: SummaryMetric) -> Option<f64> {
        match metric {
            SummaryMetric::Population => self.population,
            SummaryMetric::TotalCases => self.total_cases,
            SummaryMetric::NewCases => self.new_cases,
            SummaryMetric::TotalDeaths => self.total_deaths,
            SummaryMetric::NewDeaths => self.new_deaths,
            SummaryMetric::TotalRecovered => self.total_recovered,
            SummaryMetric::ActiveCases => self.active_cases,
            SummaryMetric::SeriousCritical => self.serious_critical,
            SummaryMetric::TotalTests => self.total_tests,
        }
    }
}

/// Numeric columns of the snapshot table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SummaryMetric {
    Population,
    TotalCases,
    NewCases,
    TotalDeaths,
    NewDeaths,
    TotalRecovered,
    ActiveCases,
    SeriousCritical,
    TotalTests,
}

impl SummaryMetric {
    pub const ALL: [SummaryMetric; 9] = [
        SummaryMetric::Population,
        SummaryMetric::TotalCases,
        SummaryMetric::NewCases,
        SummaryMetric::TotalDeaths,
        SummaryMetric::NewDeaths,
        SummaryMetric::TotalRecovered,
        SummaryMetric::ActiveCases,
        SummaryMetric::SeriousCritical,
        SummaryMetric::TotalTests,
    ];

    /// Canonical column name.
    pub fn column(self) -> &'static str {
        match self {
            SummaryMetric::Population => "population",
            SummaryMetric::TotalCases => "total_cases",
            SummaryMetric::NewCases => "new_cases",
            SummaryMetric::TotalDeaths => "total_deaths",
            SummaryMetric::NewDeaths => "new_deaths",
            SummaryMetric::TotalRecovered => "total_recovered",
            SummaryMetric::ActiveCases => "active_cases",
            SummaryMetric::SeriousCritical => "serious_critical",
            SummaryMetric::TotalTests => "total_tests",
        }
    }

    /// Header used by the published snapshot.
    pub fn header(self) -> &'static str {
        match self {
            SummaryMetric::Population => "Population",
            SummaryMetric::TotalCases => "TotalCases",
            SummaryMetric::NewCases => "NewCases",
            SummaryMetric::TotalDeaths => "TotalDeaths",
            SummaryMetric::NewDeaths => "NewDeaths",
            SummaryMetric::TotalRecovered => "TotalRecovered",
            SummaryMetric::ActiveCases => "ActiveCases",
            SummaryMetric::SeriousCritical => "Serious,Critical",
            SummaryMetric::TotalTests => "TotalTests",
        }
    }
}

impl fmt::Display for SummaryMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for SummaryMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        SummaryMetric::ALL
            .into_iter()
            .find(|m| m.column() == s || m.header() == s)
            .ok_or_else(|| s.to_string())
    }
}

/// One point of a trend series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub confirmed: f64,
    pub deaths: f64,
    pub recovered: f64,
    pub active: f64,
}

impl TrendPoint {
    pub const COLUMNS: [&'static str; 5] = ["date", "confirmed", "deaths", "recovered", "active"];

    pub fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            confirmed: 0.0,
            deaths: 0.0,
            recovered: 0.0,
            active: 0.0,
        }
    }

    /// Add a case record's four metrics into this point.
    pub fn accumulate(&mut self, record: &CaseRecord) {
        self.confirmed += record.confirmed;
        self.deaths += record.deaths;
        self.recovered += record.recovered;
        self.active += record.active;
    }
}

impl From<&CaseRecord> for TrendPoint {
    fn from(record: &CaseRecord) -> Self {
        Self {
            date: record.date,
            confirmed: record.confirmed,
            deaths: record.deaths,
            recovered: record.recovered,
            active: record.active,
        }
    }
}
