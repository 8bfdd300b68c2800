//! Country selection shared by the trend and totals views.

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// The active country filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Selection {
    /// Aggregate across every entity.
    #[default]
    All,
    /// One entity, matched exactly as stored.
    Entity(String),
}

impl Selection {
    /// Label shown for the aggregate selection in pickers.
    pub const GLOBAL_LABEL: &'static str = "Global";

    pub fn entity(name: impl Into<String>) -> Self {
        Selection::Entity(name.into())
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selection::All)
    }
}

impl FromStr for Selection {
    type Err = Infallible;

    /// `ALL` and `Global` select the aggregate; anything else names an entity.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s {
            "ALL" | "Global" => Selection::All,
            name => Selection::Entity(name.to_string()),
        })
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(Self::GLOBAL_LABEL),
            Selection::Entity(name) => f.write_str(name),
        }
    }
}
