//! Cache Module
//!
//! Bounded-memory LRU storage and the per-namespace read-through cache built on it.

mod byte_view;
mod lru;
mod namespace;
mod registry;
mod source;
mod stats;
mod store;


// Re-export public types
pub use byte_view::ByteView;
pub use lru::{Entry, LruList};
pub use namespace::NamespaceCache;
pub use registry::CacheRegistry;
pub use source::{DataSource, SourceFn};
pub use stats::{CacheStats, LoadCounters, LoadStats, NamespaceStats};
pub use store::{EvictCallback, LruStore};
