//! Peer Client
//!
//! Issues lookups against a remote node's peer endpoint over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use prost::Message;
use reqwest::Url;
use tracing::debug;

use super::protocol::{FetchRequest, FetchResponse, PeerError, PeerGetter};

// == HTTP Peer ==
/// A remote node reachable at `base_url` (its address followed by the peer base path).
#[derive(Debug, Clone)]
pub struct HttpPeer {
    addr: String,
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpPeer {
    /// `addr` is the node's base address (e.g. `http://10.0.0.2:8001`),
    /// `base_path` the path its peer endpoint is mounted under.
    pub fn new(addr: &str, base_path: &str, client: reqwest::Client, timeout: Duration) -> Self {
        Self {
            addr: addr.to_string(),
            base_url: format!("{}{}", addr.trim_end_matches('/'), base_path),
            client,
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // == URL ==
    /// Builds `base_url + escape(namespace) + "/" + escape(key)`.
    pub fn url_for(&self, req: &FetchRequest) -> Result<Url, PeerError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|_| PeerError::Address(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|_| PeerError::Address(self.base_url.clone()))?
            .pop_if_empty()
            .push(&req.namespace)
            .push(&req.key);
        Ok(url)
    }
}

#[async_trait]
impl PeerGetter for HttpPeer {
    async fn fetch(&self, req: &FetchRequest) -> Result<FetchResponse, PeerError> {
        let url = self.url_for(req)?;
        debug!(%url, "fetching from peer");

        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| PeerError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(PeerError::Status(response.status().as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| PeerError::Body(e.to_string()))?;

        FetchResponse::decode(body).map_err(|e| PeerError::Decode(e.to_string()))
    }

    fn addr(&self) -> &str {
        &self.addr
    }
}
