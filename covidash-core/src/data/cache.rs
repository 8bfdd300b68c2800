//! In-memory memoization of loaded datasets.
//!
//! Keyed by the `SourceConfig` value, not by call site. Entries live for the
//! process lifetime, or until `ttl` elapses when one is configured. Inserts
//! are last-writer-wins: two callers racing on the same key both load, and
//! whichever inserts last wins. Loads of unchanged sources are equal, so
//! the overwrite is harmless.

use super::source::SourceConfig;
use super::table::Dataset;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug)]
struct CacheEntry {
    dataset: Arc<Dataset>,
    loaded_at: Instant,
}

/// Memoized datasets keyed by source configuration.
#[derive(Debug, Default)]
pub struct LoadCache {
    entries: Mutex<HashMap<SourceConfig, CacheEntry>>,
    ttl: Option<Duration>,
}

impl LoadCache {
    /// Cache that keeps entries for the process lifetime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache whose entries expire `ttl` after they were loaded.
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl: Some(ttl),
        }
    }

    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<SourceConfig, CacheEntry>> {
        // Every write is a single map operation, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fresh cached dataset for `config`, if any. Expired entries are dropped.
    pub fn get(&self, config: &SourceConfig) -> Option<Arc<Dataset>> {
        let mut entries = self.lock();
        let entry = entries.get(config)?;

        if let Some(ttl) = self.ttl {
            if entry.loaded_at.elapsed() >= ttl {
                warn!(?config, ttl_secs = ttl.as_secs(), "cached dataset expired");
                entries.remove(config);
                return None;
            }
        }

        debug!(?config, "dataset cache hit");
        Some(Arc::clone(&entry.dataset))
    }

    /// Store a dataset, replacing any previous entry for the same config.
    pub fn insert(&self, config: SourceConfig, dataset: Arc<Dataset>) {
        self.lock().insert(
            config,
            CacheEntry {
                dataset,
                loaded_at: Instant::now(),
            },
        );
    }

    /// Forget the entry for one config. Returns whether one was present.
    pub fn invalidate(&self, config: &SourceConfig) -> bool {
        self.lock().remove(config).is_some()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
