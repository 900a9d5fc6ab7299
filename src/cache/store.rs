//! LRU Store Module
//!
//! Bounded-memory eviction engine: a key index over an [`LruList`] with a byte budget.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::cache::lru::{Entry, LruList, Slot};
use crate::cache::{ByteView, CacheStats};

/// Callback invoked with every entry the store evicts.
pub type EvictCallback = Box<dyn FnMut(&str, &ByteView) + Send + Sync>;

// == LRU Store ==
/// Key/value store that discards least recently used entries once the bytes
/// held (keys plus values) exceed `capacity`. A capacity of 0 means unlimited.
///
/// Not internally synchronized; callers serialize access.
pub struct LruStore {
    /// Recency-ordered entries
    list: LruList,
    /// Key to slot in `list`
    index: HashMap<String, Slot>,
    /// Byte budget, 0 = unlimited
    capacity: usize,
    /// Bytes currently held
    used: usize,
    /// Performance statistics
    stats: CacheStats,
    on_evict: Option<EvictCallback>,
}

impl LruStore {
    // == Constructor ==
    /// Creates an empty store with the given byte budget.
    pub fn new(capacity: usize) -> Self {
        Self {
            list: LruList::new(),
            index: HashMap::new(),
            capacity,
            used: 0,
            stats: CacheStats::new(),
            on_evict: None,
        }
    }

    /// Creates an empty store that reports evictions to `on_evict`.
    pub fn with_evict_callback(capacity: usize, on_evict: EvictCallback) -> Self {
        Self {
            on_evict: Some(on_evict),
            ..Self::new(capacity)
        }
    }

    // == Set ==
    /// Stores `value` under `key` as the most recently used entry.
    ///
    /// An existing entry is replaced in place and its size delta applied. Afterwards
    /// least recently used entries are evicted until the budget holds again, which
    /// can include the entry just written when it alone exceeds the budget.
    pub fn set(&mut self, key: &str, value: ByteView) {
        match self.index.get(key).copied() {
            Some(slot) => {
                self.list.move_to_front(slot);
                if let Some(entry) = self.list.get_mut(slot) {
                    self.used = self.used - entry.value.len() + value.len();
                    entry.value = value;
                }
            }
            None => {
                let entry = Entry::new(key, value);
                self.used += entry.size();
                let slot = self.list.push_front(entry);
                self.index.insert(key.to_string(), slot);
            }
        }

        while self.capacity != 0 && self.used > self.capacity {
            if !self.evict_oldest() {
                break;
            }
        }
    }

    // == Get ==
    /// Returns a copy of the value under `key`, marking it most recently used.
    pub fn get(&mut self, key: &str) -> Option<ByteView> {
        match self.index.get(key).copied() {
            Some(slot) => {
                self.list.move_to_front(slot);
                self.stats.record_hit();
                self.list.get(slot).map(|entry| entry.value.clone())
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    // == Evict Oldest ==
    /// Evicts the least recently used entry. Returns false when the store is empty.
    pub fn evict_oldest(&mut self) -> bool {
        let Some(entry) = self.list.pop_back() else {
            return false;
        };

        self.index.remove(&entry.key);
        self.used -= entry.size();
        self.stats.record_eviction();
        trace!(key = %entry.key, size = entry.size(), "evicted entry");

        if let Some(on_evict) = self.on_evict.as_mut() {
            on_evict(&entry.key, &entry.value);
        }
        true
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    // == Length ==
    /// Returns the number of live entries.
    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    /// Bytes currently charged against the budget.
    pub fn used_bytes(&self) -> usize {
        self.used
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.list.iter().map(|entry| entry.key.as_str())
    }

    /// Live entries from most to least recently used, without touching recency.
    pub(crate) fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.list.iter()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.total_entries = self.len();
        stats.used_bytes = self.used;
        stats
    }
}

impl fmt::Debug for LruStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruStore")
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("len", &self.len())
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
