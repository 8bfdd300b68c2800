//! covidash core: the data pipeline behind the COVID-19 dashboard.
//!
//! This crate contains everything the dashboard computes:
//! - Dataset loading from spreadsheet CSV exports or a local directory
//! - Eager schema validation into typed rows
//! - Memoization keyed by source configuration, with optional TTL
//! - Trend series (global aggregate or one country)
//! - Snapshot rankings and metric-card totals
//! - Missing-value reports over the raw tables
//!
//! Rendering is left to the caller.

pub mod config;
pub mod data;
pub mod quality;
pub mod views;

pub use config::{ConfigError, DashboardConfig};
pub use data::{
    load, CaseRecord, DataError, Dataset, LoadOptions, Loader, SnapshotRecord, SourceConfig,
    SummaryMetric, Table, TrendPoint,
};
pub use quality::MissingReport;
pub use views::{entities, rank, rank_by, totals, trend, Selection, Totals, ViewError};
