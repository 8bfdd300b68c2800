//! Dashboard configuration, loaded from TOML.
//!
//! ```toml
//! [source]
//! kind = "local"
//! base_dir = "data"
//!
//! [cache]
//! ttl_secs = 600
//!
//! [http]
//! timeout_secs = 30
//!
//! [views]
//! snapshot_top_n = 20
//! deaths_top_n = 15
//! ```
//!
//! Every section is optional; the default reads the published spreadsheets.

use crate::data::{LoadOptions, SourceConfig, DEFAULT_TIMEOUT};
use crate::views::{DEFAULT_DEATHS_TOP_N, DEFAULT_SNAPSHOT_TOP_N};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub cache: CacheSettings,
    pub http: HttpSettings,
    pub views: ViewSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Seconds a loaded dataset stays memoized. Absent: process lifetime.
    pub ttl_secs: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewSettings {
    pub snapshot_top_n: usize,
    pub deaths_top_n: usize,
}

impl Default for ViewSettings {
    fn default() -> Self {
        Self {
            snapshot_top_n: DEFAULT_SNAPSHOT_TOP_N,
            deaths_top_n: DEFAULT_DEATHS_TOP_N,
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default_remote(),
            cache: CacheSettings::default(),
            http: HttpSettings::default(),
            views: ViewSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Load a config file. A relative local `base_dir` is resolved against
    /// the directory containing the file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&content)?;

        if let SourceConfig::Local { base_dir } = &mut config.source {
            if base_dir.is_relative() {
                if let Some(parent) = path.parent() {
                    *base_dir = parent.join(&*base_dir);
                }
            }
        }
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load options for this config. A zero `timeout_secs` means the default.
    pub fn load_options(&self) -> LoadOptions {
        let timeout = match self.http.timeout_secs {
            0 => DEFAULT_TIMEOUT,
            secs => Duration::from_secs(secs),
        };
        LoadOptions {
            timeout,
            cache_ttl: self.cache.ttl_secs.map(Duration::from_secs),
        }
    }
}
