//! Data loading and memoization

pub mod cache;
pub mod ingest;
pub mod loader;
pub mod local;
pub mod provider;
pub mod records;
pub mod schema;
pub mod sheets;
pub mod source;
pub mod table;

pub use cache::LoadCache;
pub use loader::{load, load_from, LoadOptions, Loader, DEFAULT_TIMEOUT};
pub use local::LocalDirectory;
pub use provider::{DataError, DataOrigin, InMemorySource, RawTable, TableKind, TableSource};
pub use records::{CaseRecord, SnapshotRecord, SummaryMetric, TrendPoint};
pub use schema::{ColumnSpec, TableSchema};
pub use sheets::SheetsExport;
pub use source::{SheetRef, SourceConfig};
pub use table::{Dataset, Table};
