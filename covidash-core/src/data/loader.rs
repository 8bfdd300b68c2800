//! Dataset loading: resolve the source, fetch both tables, ingest, memoize.
//!
//! `load` performs one uncached load. `Loader` wraps the same pipeline with a
//! `LoadCache` so repeated loads of an unchanged config return the cached
//! tables without touching the network or disk. No step retries; the first
//! error is returned to the caller.

use super::cache::LoadCache;
use super::ingest::{ingest_primary, ingest_summary};
use super::provider::{DataError, TableKind, TableSource};
use super::source::SourceConfig;
use super::table::Dataset;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Network timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options controlling how datasets are loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Per-request timeout for remote sources.
    pub timeout: Duration,
    /// Memoization lifetime. `None` keeps entries for the process lifetime.
    pub cache_ttl: Option<Duration>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            cache_ttl: None,
        }
    }
}

/// Load both tables for `config` without memoization.
pub fn load(config: &SourceConfig) -> Result<Dataset, DataError> {
    let source = config.open(DEFAULT_TIMEOUT)?;
    load_from(source.as_ref())
}

/// Fetch and ingest both tables from an already-built source.
pub fn load_from(source: &dyn TableSource) -> Result<Dataset, DataError> {
    let primary_raw = source.fetch(TableKind::Primary)?;
    let primary = ingest_primary(&primary_raw)?;

    let summary_raw = source.fetch(TableKind::Summary)?;
    let summary = ingest_summary(&summary_raw)?;

    let dataset = Dataset { primary, summary };
    info!(
        source = source.name(),
        primary_rows = dataset.primary.len(),
        summary_rows = dataset.summary.len(),
        fingerprint = %dataset.fingerprint(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Memoizing loader.
#[derive(Debug, Default)]
pub struct Loader {
    cache: LoadCache,
    timeout: Duration,
}

impl Loader {
    pub fn new(opts: &LoadOptions) -> Self {
        let cache = match opts.cache_ttl {
            Some(ttl) => LoadCache::with_ttl(ttl),
            None => LoadCache::new(),
        };
        Self {
            cache,
            timeout: opts.timeout,
        }
    }

    pub fn cache(&self) -> &LoadCache {
        &self.cache
    }

    /// Load `config`, returning the memoized dataset when one is fresh.
    pub fn load(&self, config: &SourceConfig) -> Result<Arc<Dataset>, DataError> {
        if let Some(hit) = self.cache.get(config) {
            return Ok(hit);
        }
        let source = config.open(self.effective_timeout())?;
        self.load_and_store(config, source.as_ref())
    }

    /// Like [`Loader::load`], but a cache miss reads from `source` instead of
    /// opening the source described by `config`. `config` remains the cache key.
    pub fn load_with(
        &self,
        config: &SourceConfig,
        source: &dyn TableSource,
    ) -> Result<Arc<Dataset>, DataError> {
        if let Some(hit) = self.cache.get(config) {
            return Ok(hit);
        }
        self.load_and_store(config, source)
    }

    fn load_and_store(
        &self,
        config: &SourceConfig,
        source: &dyn TableSource,
    ) -> Result<Arc<Dataset>, DataError> {
        let dataset = Arc::new(load_from(source)?);
        self.cache.insert(config.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }

    fn effective_timeout(&self) -> Duration {
        if self.timeout.is_zero() {
            DEFAULT_TIMEOUT
        } else {
            self.timeout
        }
    }
}
