//! Client-side query cache keyed by resource

use std::collections::HashSet;
use std::sync::RwLock;

use tracing::debug;

use super::ResourceType;

/// Keys under which query results are cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Cached list/detail queries for one resource type
    Resource(ResourceType),
    /// Cross-cutting dashboard statistics derived from several resources
    DashboardStats,
    /// Manual ledger entries
    Ledger,
}

/// Something that can mark cached data stale
///
/// Both the router and the entry manager talk to the cache through this
/// seam, so tests can substitute a recording sink.
pub trait InvalidationSink: Send + Sync {
    /// Mark one key stale; invalidating an already-stale key is a no-op
    fn invalidate(&self, key: CacheKey);

    /// Drop everything, fresh or stale
    fn clear(&self);
}

/// In-memory freshness tracker for cached queries
///
/// The actual query results live in the data-fetching layer; this tracks
/// which keys are still fresh. Reads and writes both happen behind a lock
/// so the router tasks and readers never race.
#[derive(Debug, Default)]
pub struct QueryCache {
    fresh: RwLock<HashSet<CacheKey>>,
}

impl QueryCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Record that a query for `key` was fetched and is fresh
    pub fn mark_fresh(&self, key: CacheKey) {
        self.fresh.write().unwrap().insert(key);
    }

    /// Whether `key` holds fresh data
    pub fn is_fresh(&self, key: CacheKey) -> bool {
        self.fresh.read().unwrap().contains(&key)
    }

    /// Number of fresh keys
    pub fn fresh_count(&self) -> usize {
        self.fresh.read().unwrap().len()
    }
}

impl InvalidationSink for QueryCache {
    fn invalidate(&self, key: CacheKey) {
        let removed = self.fresh.write().unwrap().remove(&key);
        if removed {
            debug!(?key, "cache key invalidated");
        }
    }

    fn clear(&self) {
        self.fresh.write().unwrap().clear();
        debug!("query cache cleared");
    }
}
