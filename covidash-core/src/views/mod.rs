//! View builders: pure functions from loaded tables to the derived views.
//!
//! None of these mutate their inputs. Each returns a new table or value, so
//! the same `Arc<Dataset>` can back any number of concurrent selections.

pub mod entities;
pub mod rank;
pub mod selection;
pub mod totals;
pub mod trend;

pub use entities::entities;
pub use rank::{
    latest_snapshot, rank, rank_by, top_deaths, DEFAULT_DEATHS_TOP_N, DEFAULT_SNAPSHOT_TOP_N,
};
pub use selection::Selection;
pub use totals::{totals, Totals};
pub use trend::trend;

use thiserror::Error;

/// Errors from deriving a view. All are caller input problems or data
/// integrity conditions; none are retried or papered over.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("unknown entity '{entity}'")]
    UnknownEntity { entity: String },

    #[error("entity '{entity}' matches {matches} snapshot rows, expected exactly one")]
    AmbiguousEntity { entity: String, matches: usize },

    #[error("unknown metric '{metric}': not a numeric column of the summary table")]
    UnknownMetric { metric: String },
}
