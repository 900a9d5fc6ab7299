//! Configuration Module
//!
//! Handles loading and managing node configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::flight::DEFAULT_GRACE;
use crate::peer::{DEFAULT_BASE_PATH, DEFAULT_PEER_TIMEOUT};
use crate::ring::DEFAULT_REPLICAS;

/// Node configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Address other nodes reach this one at; must match its entry in `peers`
    pub self_addr: String,
    /// Base addresses of every node sharing the keyspace, this one included
    pub peers: Vec<String>,
    /// Byte budget of the served namespace, 0 = unlimited
    pub cache_bytes: usize,
    /// Virtual replicas per node on the hash ring
    pub replicas: usize,
    /// Path prefix of the peer endpoint, starts and ends with `/`
    pub base_path: String,
    /// Namespace served by this node
    pub namespace: String,
    /// How long a finished fetch stays joinable
    pub flight_grace: Duration,
    /// Timeout for lookups against other nodes
    pub peer_timeout: Duration,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 8001)
    /// - `SELF_ADDR` - This node's address (default: `http://localhost:<port>`)
    /// - `PEERS` - Comma-separated node addresses (default: `SELF_ADDR`)
    /// - `CACHE_BYTES` - Byte budget (default: 2048)
    /// - `REPLICAS` - Virtual replicas per node (default: 50)
    /// - `BASE_PATH` - Peer endpoint prefix (default: `/_peercache/`)
    /// - `NAMESPACE` - Served namespace (default: `scores`)
    /// - `FLIGHT_GRACE_MS` - Coalescing grace window (default: 10)
    /// - `PEER_TIMEOUT_MS` - Peer request timeout (default: 2000)
    pub fn from_env() -> Self {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Builds the config from an arbitrary variable lookup.
    ///
    /// Node addresses are stored without a trailing `/` so `self_addr` compares
    /// equal to its entry in `peers`.
    pub fn from_vars<F>(var: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let server_port = parse(&var, "SERVER_PORT").unwrap_or(defaults.server_port);
        let self_addr = var("SELF_ADDR")
            .map(|v| normalize_addr(&v))
            .filter(|addr| !addr.is_empty())
            .unwrap_or_else(|| format!("http://localhost:{}", server_port));
        let peers = var("PEERS")
            .map(|v| split_list(&v))
            .filter(|peers| !peers.is_empty())
            .unwrap_or_else(|| vec![self_addr.clone()]);

        Self {
            server_port,
            self_addr,
            peers,
            cache_bytes: parse(&var, "CACHE_BYTES").unwrap_or(defaults.cache_bytes),
            replicas: parse(&var, "REPLICAS").unwrap_or(defaults.replicas),
            base_path: var("BASE_PATH")
                .map(|v| normalize_base_path(&v))
                .unwrap_or(defaults.base_path),
            namespace: var("NAMESPACE").unwrap_or(defaults.namespace),
            flight_grace: parse(&var, "FLIGHT_GRACE_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.flight_grace),
            peer_timeout: parse(&var, "PEER_TIMEOUT_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.peer_timeout),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let self_addr = "http://localhost:8001".to_string();
        Self {
            server_port: 8001,
            peers: vec![self_addr.clone()],
            self_addr,
            cache_bytes: 2 << 10,
            replicas: DEFAULT_REPLICAS,
            base_path: DEFAULT_BASE_PATH.to_string(),
            namespace: "scores".to_string(),
            flight_grace: DEFAULT_GRACE,
            peer_timeout: DEFAULT_PEER_TIMEOUT,
        }
    }
}

fn parse<T, F>(var: &F, name: &str) -> Option<T>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    var(name).and_then(|v| v.trim().parse().ok())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(normalize_addr)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Trims whitespace and any trailing `/` from a node address.
pub fn normalize_addr(addr: &str) -> String {
    addr.trim().trim_end_matches('/').to_string()
}

/// Ensures the path starts and ends with `/`.
pub fn normalize_base_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{}/", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers, vec!["http://localhost:8001".to_string()]);
        assert_eq!(config.cache_bytes, 2048);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.base_path, "/_peercache/");
        assert_eq!(config.flight_grace, Duration::from_millis(10));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for var in [
            "SERVER_PORT",
            "SELF_ADDR",
            "PEERS",
            "CACHE_BYTES",
            "REPLICAS",
            "BASE_PATH",
            "NAMESPACE",
            "FLIGHT_GRACE_MS",
            "PEER_TIMEOUT_MS",
        ] {
            env::remove_var(var);
        }

        let config = Config::from_env();
        assert_eq!(config.server_port, 8001);
        assert_eq!(config.self_addr, "http://localhost:8001");
        assert_eq!(config.peers, vec![config.self_addr.clone()]);
        assert_eq!(config.namespace, "scores");
        assert_eq!(config.peer_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_trailing_slashes_keep_self_in_peers() {
        let vars = HashMap::from([
            ("SELF_ADDR", "http://localhost:8001/"),
            ("PEERS", "http://localhost:8001/, http://localhost:8002/"),
        ]);

        let config = Config::from_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.self_addr, "http://localhost:8001");
        assert!(config.peers.contains(&config.self_addr));
        assert_eq!(config.peers[1], "http://localhost:8002");
    }

    #[test]
    fn test_from_vars_parses_values() {
        let vars = HashMap::from([
            ("SERVER_PORT", "9000"),
            ("CACHE_BYTES", " 0 "),
            ("REPLICAS", "not-a-number"),
            ("BASE_PATH", "cache"),
            ("FLIGHT_GRACE_MS", "25"),
        ]);

        let config = Config::from_vars(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.self_addr, "http://localhost:9000");
        assert_eq!(config.peers, vec!["http://localhost:9000".to_string()]);
        assert_eq!(config.cache_bytes, 0);
        assert_eq!(config.replicas, 50);
        assert_eq!(config.base_path, "/cache/");
        assert_eq!(config.flight_grace, Duration::from_millis(25));
    }

    #[test]
    fn test_split_list() {
        assert_eq!(
            split_list(" http://a:1/ ,http://b:2,, "),
            vec!["http://a:1".to_string(), "http://b:2".to_string()]
        );
        assert!(split_list("").is_empty());
    }

    #[test]
    fn test_normalize_base_path() {
        assert_eq!(normalize_base_path("_peercache"), "/_peercache/");
        assert_eq!(normalize_base_path("/a/b"), "/a/b/");
        assert_eq!(normalize_base_path("/x/"), "/x/");
        assert_eq!(normalize_base_path(""), "/");
    }
}
