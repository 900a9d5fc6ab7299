//! Peer Cache - a namespaced, distributed read-through cache
//!
//! Each node keeps a bounded-memory LRU store per namespace. On a miss it asks
//! the peer owning the key (chosen by consistent hashing) and falls back to the
//! namespace's data source, coalescing concurrent misses for the same key.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod flight;
pub mod models;
pub mod peer;
pub mod ring;

pub use api::{create_router, AppState};
pub use cache::{ByteView, CacheRegistry, DataSource, NamespaceCache, SourceFn};
pub use config::Config;
pub use error::CacheError;
pub use peer::PeerPool;
