//! Cache Registry Module
//!
//! Caller-owned lookup table from namespace name to its cache.

use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;

use crate::cache::{DataSource, NamespaceCache};

// == Cache Registry ==
/// Namespace caches known to this process. Creating a cache under an existing
/// name replaces the previous one.
#[derive(Debug, Default)]
pub struct CacheRegistry {
    caches: DashMap<String, Arc<NamespaceCache>>,
}

impl CacheRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // == Create ==
    /// Constructs a cache for `namespace` and registers it, replacing any
    /// existing cache of that name.
    pub fn create(
        &self,
        namespace: &str,
        capacity: usize,
        source: Arc<dyn DataSource>,
    ) -> Arc<NamespaceCache> {
        self.insert(NamespaceCache::new(namespace, capacity, source))
    }

    /// Registers an already built cache under its own name.
    pub fn insert(&self, cache: NamespaceCache) -> Arc<NamespaceCache> {
        let cache = Arc::new(cache);
        let replaced = self
            .caches
            .insert(cache.name().to_string(), cache.clone())
            .is_some();
        info!(namespace = cache.name(), replaced, "namespace cache registered");
        cache
    }

    // == Get ==
    /// Looks up the cache for `namespace`.
    pub fn get(&self, namespace: &str) -> Option<Arc<NamespaceCache>> {
        self.caches.get(namespace).map(|entry| entry.value().clone())
    }

    /// Registered namespace names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.caches.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.caches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.caches.is_empty()
    }
}
