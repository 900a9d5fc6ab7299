//! Peer Pool
//!
//! Binds ring node names to HTTP peers and selects the remote owner of a key.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use tracing::{debug, info};

use super::client::HttpPeer;
use super::protocol::{PeerGetter, PeerPicker, DEFAULT_BASE_PATH};
use crate::ring::{HashRing, DEFAULT_REPLICAS};

/// Request timeout for peer lookups unless configured otherwise.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
struct Membership {
    ring: HashRing,
    peers: HashMap<String, Arc<HttpPeer>>,
}

// == Peer Pool ==
/// The set of nodes sharing the keyspace, as seen from `self_addr`.
#[derive(Debug)]
pub struct PeerPool {
    self_addr: String,
    base_path: String,
    replicas: usize,
    timeout: Duration,
    client: reqwest::Client,
    membership: RwLock<Membership>,
}

impl PeerPool {
    // == Constructor ==
    /// Creates a pool for the node reachable at `self_addr`, with no peers yet.
    pub fn new(self_addr: impl Into<String>) -> Self {
        Self::with_options(
            self_addr,
            DEFAULT_BASE_PATH,
            DEFAULT_REPLICAS,
            DEFAULT_PEER_TIMEOUT,
        )
    }

    pub fn with_options(
        self_addr: impl Into<String>,
        base_path: impl Into<String>,
        replicas: usize,
        timeout: Duration,
    ) -> Self {
        let self_addr: String = self_addr.into();
        Self {
            self_addr: trim_addr(&self_addr),
            base_path: base_path.into(),
            replicas,
            timeout,
            client: reqwest::Client::new(),
            membership: RwLock::new(Membership {
                ring: HashRing::new(replicas, None),
                peers: HashMap::new(),
            }),
        }
    }

    // == Set Peers ==
    /// Replaces the whole peer set. The local node should be included so it owns
    /// its share of the keyspace.
    pub fn set_peers<I, S>(&self, addrs: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let addrs: Vec<String> = addrs.into_iter().map(|a| trim_addr(a.as_ref())).collect();

        let mut ring = HashRing::new(self.replicas, None);
        ring.add(&addrs);
        let peers = addrs
            .iter()
            .map(|addr| {
                let peer = HttpPeer::new(addr, &self.base_path, self.client.clone(), self.timeout);
                (addr.clone(), Arc::new(peer))
            })
            .collect();

        let mut membership = self
            .membership
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *membership = Membership { ring, peers };
        info!(node = %self.self_addr, peers = ?addrs, "peer set updated");
    }

    /// Ring node owning `key`, which may be this node.
    pub fn owner(&self, key: &str) -> Option<String> {
        let membership = self.membership.read().unwrap_or_else(PoisonError::into_inner);
        membership.ring.get(key).map(str::to_string)
    }

    pub fn self_addr(&self) -> &str {
        &self.self_addr
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    pub fn len(&self) -> usize {
        self.membership
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .peers
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Node names are compared without a trailing `/`.
fn trim_addr(addr: &str) -> String {
    addr.trim().trim_end_matches('/').to_string()
}

impl PeerPicker for PeerPool {
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>> {
        let membership = self.membership.read().unwrap_or_else(PoisonError::into_inner);
        let owner = membership.ring.get(key)?;
        if owner == self.self_addr {
            return None;
        }

        debug!(key, peer = owner, "selected remote peer");
        let peer = membership.peers.get(owner)?.clone();
        Some(peer as Arc<dyn PeerGetter>)
    }
}
