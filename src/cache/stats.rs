//! Cache Statistics Module
//!
//! Tracks eviction engine metrics (hits, misses, evictions, memory) and
//! orchestrator load counters (peer and data-source fetches).

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
/// Eviction engine metrics.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Number of lookups served from the local store
    pub hits: u64,
    /// Number of lookups that missed the local store
    pub misses: u64,
    /// Number of entries evicted to stay within the memory budget
    pub evictions: u64,
    /// Current number of entries
    pub total_entries: usize,
    /// Bytes currently charged against the budget (keys plus values)
    pub used_bytes: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Load Counters ==
/// Counters for fetches issued by a namespace cache after a local miss.
///
/// Updated without the store lock, so they are atomics.
#[derive(Debug, Default)]
pub struct LoadCounters {
    peer_loads: AtomicU64,
    peer_failures: AtomicU64,
    source_loads: AtomicU64,
    source_failures: AtomicU64,
}

/// Point-in-time copy of [`LoadCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    /// Values fetched from a remote peer
    pub peer_loads: u64,
    /// Remote attempts that failed and fell back to the data source
    pub peer_failures: u64,
    /// Values fetched from the local data source
    pub source_loads: u64,
    /// Data source failures surfaced to callers
    pub source_failures: u64,
}

impl LoadCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_peer_failure(&self) {
        self.peer_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_load(&self) {
        self.source_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_source_failure(&self) {
        self.source_failures.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> LoadStats {
        LoadStats {
            peer_loads: self.peer_loads.load(Ordering::Relaxed),
            peer_failures: self.peer_failures.load(Ordering::Relaxed),
            source_loads: self.source_loads.load(Ordering::Relaxed),
            source_failures: self.source_failures.load(Ordering::Relaxed),
        }
    }
}

// == Namespace Stats ==
/// Everything a namespace cache reports about itself.
#[derive(Debug, Clone, Serialize)]
pub struct NamespaceStats {
    pub namespace: String,
    pub capacity_bytes: usize,
    pub cache: CacheStats,
    pub loads: LoadStats,
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = CacheStats::new();
        assert_eq!(stats.hits, 0);
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.evictions, 0);
        assert_eq!(stats.total_entries, 0);
        assert_eq!(stats.used_bytes, 0);
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::new();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let mut stats = CacheStats::new();
        stats.record_hit();
        stats.record_hit();
        stats.record_hit();
        stats.record_miss();
        assert_eq!(stats.hit_rate(), 0.75);
    }

    #[test]
    fn test_record_eviction() {
        let mut stats = CacheStats::new();
        stats.record_eviction();
        stats.record_eviction();
        assert_eq!(stats.evictions, 2);
    }

    #[test]
    fn test_load_counters_snapshot() {
        let counters = LoadCounters::new();
        counters.record_peer_load();
        counters.record_peer_failure();
        counters.record_peer_failure();
        counters.record_source_load();

        let snapshot = counters.snapshot();
        assert_eq!(
            snapshot,
            LoadStats {
                peer_loads: 1,
                peer_failures: 2,
                source_loads: 1,
                source_failures: 0,
            }
        );
    }
}
