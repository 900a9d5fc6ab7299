//! Namespace Cache Module
//!
//! Read-through cache for one namespace: local store first, then a single
//! coalesced fetch that tries the owning peer before the local data source.

use std::sync::{Arc, OnceLock, PoisonError, RwLock as StdRwLock};
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{ByteView, DataSource, LoadCounters, LruStore, NamespaceStats};
use crate::error::{CacheError, Result};
use crate::flight::FlightGroup;
use crate::peer::{FetchRequest, PeerError, PeerPicker};

// == Namespace Cache ==
/// A named partition of the keyspace with its own store, data source and peers.
pub struct NamespaceCache {
    /// State shared with fetches running on their own tasks
    inner: Arc<Inner>,
    flights: FlightGroup<ByteView>,
}

struct Inner {
    name: String,
    /// Eviction engine; write-locked for every access since reads reorder recency
    store: RwLock<LruStore>,
    source: Arc<dyn DataSource>,
    /// Set at most once
    peers: OnceLock<Arc<dyn PeerPicker>>,
    loads: LoadCounters,
    /// Address of the last peer selected for a remote fetch
    remote_addr: StdRwLock<Option<String>>,
}

impl NamespaceCache {
    // == Constructor ==
    /// Creates a cache holding at most `capacity` bytes (0 = unlimited) that loads
    /// misses from `source`.
    pub fn new(name: impl Into<String>, capacity: usize, source: Arc<dyn DataSource>) -> Self {
        Self {
            inner: Arc::new(Inner {
                name: name.into(),
                store: RwLock::new(LruStore::new(capacity)),
                source,
                peers: OnceLock::new(),
                loads: LoadCounters::new(),
                remote_addr: StdRwLock::new(None),
            }),
            flights: FlightGroup::new(),
        }
    }

    /// Overrides how long a finished fetch stays joinable by later callers.
    pub fn with_flight_grace(mut self, grace: Duration) -> Self {
        self.flights = FlightGroup::with_grace(grace);
        self
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    // == Register Peers ==
    /// Attaches the peer picker. Only the first call takes effect; returns whether
    /// this call attached it.
    pub fn register_peers(&self, picker: Arc<dyn PeerPicker>) -> bool {
        let attached = self.inner.peers.set(picker).is_ok();
        if !attached {
            warn!(namespace = %self.inner.name, "peer picker already registered, ignoring");
        }
        attached
    }

    pub fn set_remote_addr(&self, addr: impl Into<String>) {
        self.inner.set_remote_addr(addr);
    }

    /// Address of the peer most recently selected for a remote fetch.
    pub fn remote_addr(&self) -> Option<String> {
        self.inner
            .remote_addr
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // == Get ==
    /// Returns the value for `key`, loading and caching it on a miss.
    ///
    /// Peer failures are logged and fall back to the data source; only data
    /// source failures reach the caller. The store lock is not held while a
    /// load is in progress, and a load runs to completion even if this caller
    /// goes away.
    pub async fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(CacheError::InvalidRequest("key is required".to_string()));
        }

        let cached = self.inner.store.write().await.get(key);
        if let Some(value) = cached {
            debug!(namespace = %self.inner.name, key, "cache hit");
            return Ok(value);
        }

        debug!(namespace = %self.inner.name, key, "cache miss");
        let inner = self.inner.clone();
        let owned_key = key.to_string();
        self.flights
            .run(key, move || async move { inner.load(&owned_key).await })
            .await
    }

    // == Set ==
    /// Writes `value` into the local store.
    pub async fn set(&self, key: &str, value: ByteView) {
        self.inner.store.write().await.set(key, value);
    }

    // == Stats ==
    pub async fn stats(&self) -> NamespaceStats {
        let store = self.inner.store.read().await;
        NamespaceStats {
            namespace: self.inner.name.clone(),
            capacity_bytes: store.capacity(),
            cache: store.stats(),
            loads: self.inner.loads.snapshot(),
        }
    }
}

impl Inner {
    fn set_remote_addr(&self, addr: impl Into<String>) {
        *self
            .remote_addr
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(addr.into());
    }

    async fn load(&self, key: &str) -> Result<ByteView> {
        match self.fetch_from_peer(key).await {
            Ok(value) => {
                self.loads.record_peer_load();
                return Ok(self.populate(key, value).await);
            }
            Err(PeerError::NoPicker | PeerError::NoPeer) => {}
            Err(err) => {
                self.loads.record_peer_failure();
                warn!(namespace = %self.name, key, error = %err, "peer fetch failed, loading locally");
            }
        }

        self.fetch_from_source(key).await
    }

    async fn fetch_from_peer(&self, key: &str) -> std::result::Result<ByteView, PeerError> {
        let picker = self.peers.get().ok_or(PeerError::NoPicker)?;
        let peer = picker.pick_peer(key).ok_or(PeerError::NoPeer)?;
        self.set_remote_addr(peer.addr());

        let response = peer.fetch(&FetchRequest::new(&self.name, key)).await?;
        info!(namespace = %self.name, key, peer = peer.addr(), "loaded from peer");
        Ok(ByteView::new(response.value))
    }

    async fn fetch_from_source(&self, key: &str) -> Result<ByteView> {
        match self.source.get(key).await {
            Ok(bytes) => {
                self.loads.record_source_load();
                info!(namespace = %self.name, key, "loaded from data source");
                Ok(self.populate(key, ByteView::new(bytes)).await)
            }
            Err(err) => {
                self.loads.record_source_failure();
                debug!(namespace = %self.name, key, error = %err, "data source failed");
                Err(CacheError::Source(err.to_string()))
            }
        }
    }

    /// Stores a copy of `value` and hands the other to the caller.
    async fn populate(&self, key: &str, value: ByteView) -> ByteView {
        self.store.write().await.set(key, value.clone());
        value
    }
}

impl std::fmt::Debug for NamespaceCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NamespaceCache")
            .field("name", &self.inner.name)
            .field("has_peers", &self.inner.peers.get().is_some())
            .finish_non_exhaustive()
    }
}
