//! Peer Cache - a namespaced, distributed read-through cache
//!
//! Runs one cache node serving a demo namespace. Start several with distinct
//! `SERVER_PORT`s and the same `PEERS` list to form a cluster.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{anyhow, Context};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use peer_cache::{create_router, AppState, CacheRegistry, Config, NamespaceCache, PeerPool, SourceFn};

/// Demo system of record for the served namespace.
const DEMO_DB: [(&str, &str); 3] = [("Tom", "630"), ("Jack", "589"), ("Sam", "567")];

/// Main entry point for a cache node.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Register the namespace cache backed by the demo data source
/// 4. Build the peer pool and attach it to the cache
/// 5. Serve the peer endpoint and client API until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "peer_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Peer Cache node");

    let config = Config::from_env();
    info!(
        "Configuration loaded: self={}, peers={:?}, namespace={}, cache_bytes={}, port={}",
        config.self_addr, config.peers, config.namespace, config.cache_bytes, config.server_port
    );

    let registry = Arc::new(CacheRegistry::new());
    let cache = registry.insert(
        NamespaceCache::new(
            config.namespace.as_str(),
            config.cache_bytes,
            Arc::new(SourceFn(demo_lookup)),
        )
        .with_flight_grace(config.flight_grace),
    );

    let pool = Arc::new(PeerPool::with_options(
        config.self_addr.as_str(),
        config.base_path.as_str(),
        config.replicas,
        config.peer_timeout,
    ));
    pool.set_peers(&config.peers);
    cache.register_peers(pool);

    let app = create_router(AppState::new(registry), &config.base_path);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Cache node listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

fn demo_lookup(key: &str) -> anyhow::Result<Vec<u8>> {
    info!(key, "searching demo data source");
    DEMO_DB
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, v)| v.as_bytes().to_vec())
        .ok_or_else(|| anyhow!("{} not exist", key))
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
