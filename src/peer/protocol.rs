//! Peer Protocol
//!
//! Envelopes exchanged between cache nodes and the capabilities a namespace
//! cache uses to reach its peers.
//!
//! Envelopes are protobuf-encoded: the request travels in the URL path, the
//! response body is a `FetchResponse`.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

/// Path prefix the peer endpoint is mounted under unless configured otherwise.
pub const DEFAULT_BASE_PATH: &str = "/_peercache/";

/// Content type of encoded envelopes.
pub const CONTENT_TYPE: &str = "application/octet-stream";

// --- Envelopes ---

/// Lookup of `key` inside `namespace` on a remote node.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FetchRequest {
    #[prost(string, tag = "1")]
    pub namespace: String,
    #[prost(string, tag = "2")]
    pub key: String,
}

impl FetchRequest {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

/// Value returned by a remote node.
#[derive(Clone, PartialEq, prost::Message)]
pub struct FetchResponse {
    #[prost(bytes = "vec", tag = "1")]
    pub value: Vec<u8>,
}

// --- Errors ---

/// Reasons a remote lookup did not produce a value.
///
/// None of these reach the caller of a cache lookup; they trigger the fallback
/// to the local data source.
#[derive(Error, Debug)]
pub enum PeerError {
    #[error("no peer picker registered")]
    NoPicker,

    #[error("no remote peer owns key")]
    NoPeer,

    #[error("invalid peer address {0}")]
    Address(String),

    #[error("peer unreachable: {0}")]
    Unreachable(String),

    #[error("peer returned status {0}")]
    Status(u16),

    #[error("reading response body: {0}")]
    Body(String),

    #[error("decoding response body: {0}")]
    Decode(String),
}

// --- Capabilities ---

/// A remote node that can answer lookups.
#[async_trait]
pub trait PeerGetter: Send + Sync {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse, PeerError>;

    /// Base address the peer is reached at, for diagnostics.
    fn addr(&self) -> &str;
}

/// Selects the node responsible for a key.
pub trait PeerPicker: Send + Sync {
    /// Returns the remote owner of `key`, or `None` when the key is owned locally
    /// or no peers are known.
    fn pick_peer(&self, key: &str) -> Option<Arc<dyn PeerGetter>>;
}
