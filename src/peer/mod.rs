//! Peer Module
//!
//! Node selection and the remote-call boundary between cache processes.

mod client;
mod pool;
mod protocol;

pub use client::HttpPeer;
pub use pool::{PeerPool, DEFAULT_PEER_TIMEOUT};
pub use protocol::{
    FetchRequest, FetchResponse, PeerError, PeerGetter, PeerPicker, CONTENT_TYPE,
    DEFAULT_BASE_PATH,
};
