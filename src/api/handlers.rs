//! API Handlers
//!
//! HTTP request handlers for the peer endpoint and the client-facing API.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use prost::Message;
use tracing::debug;

use crate::cache::{CacheRegistry, NamespaceCache};
use crate::error::{CacheError, Result};
use crate::models::{ApiQuery, HealthResponse, StatsResponse};
use crate::peer::{FetchResponse, CONTENT_TYPE};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Namespace caches served by this node
    pub registry: Arc<CacheRegistry>,
}

impl AppState {
    /// Creates a new AppState over the given registry.
    pub fn new(registry: Arc<CacheRegistry>) -> Self {
        Self { registry }
    }

    fn cache(&self, namespace: &str) -> Result<Arc<NamespaceCache>> {
        self.registry
            .get(namespace)
            .ok_or_else(|| CacheError::NamespaceNotFound(namespace.to_string()))
    }
}

/// Handler for GET <base-path>*path
///
/// Serves lookups from other nodes. `path` must be `<namespace>/<key>`; the
/// value is returned as an encoded `FetchResponse`.
pub async fn peer_handler(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response> {
    let (namespace, key) = path
        .split_once('/')
        .ok_or_else(|| CacheError::InvalidRequest(format!("expected <namespace>/<key>, got '{}'", path)))?;
    debug!(namespace, key, "peer request");

    let cache = state.cache(namespace)?;
    let value = cache.get(key).await?;

    let body = FetchResponse {
        value: value.to_vec(),
    }
    .encode_to_vec();

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], body).into_response())
}

/// Handler for GET /api/:namespace?key=...
///
/// Returns the raw value bytes.
pub async fn api_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
    Query(query): Query<ApiQuery>,
) -> Result<Response> {
    let cache = state.cache(&namespace)?;
    let value = cache.get(&query.key).await?;

    Ok(([(header::CONTENT_TYPE, CONTENT_TYPE)], value.into_vec()).into_response())
}

/// Handler for GET /stats/:namespace
pub async fn stats_handler(
    State(state): State<AppState>,
    Path(namespace): Path<String>,
) -> Result<Json<StatsResponse>> {
    let cache = state.cache(&namespace)?;
    let stats = cache.stats().await;

    Ok(Json(StatsResponse::new(stats, cache.remote_addr())))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.registry.names()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{ByteView, SourceFn};
    use anyhow::anyhow;

    fn test_state() -> AppState {
        let registry = Arc::new(CacheRegistry::new());
        registry.create(
            "scores",
            2 << 10,
            Arc::new(SourceFn(|key: &str| match key {
                "Tom" => Ok(b"630".to_vec()),
                _ => Err(anyhow!("{} not exist", key)),
            })),
        );
        AppState::new(registry)
    }

    async fn body_bytes(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[tokio::test]
    async fn test_peer_handler_encodes_value() {
        let response = peer_handler(State(test_state()), Path("scores/Tom".to_string()))
            .await
            .unwrap();

        let decoded = FetchResponse::decode(body_bytes(response).await.as_slice()).unwrap();
        assert_eq!(decoded.value, b"630".to_vec());
    }

    #[tokio::test]
    async fn test_peer_handler_malformed_path() {
        let result = peer_handler(State(test_state()), Path("scores".to_string())).await;
        assert!(matches!(result, Err(CacheError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_peer_handler_unknown_namespace() {
        let result = peer_handler(State(test_state()), Path("ages/Tom".to_string())).await;
        assert!(matches!(result, Err(CacheError::NamespaceNotFound(_))));
    }

    #[tokio::test]
    async fn test_peer_handler_source_error() {
        let result = peer_handler(State(test_state()), Path("scores/kkk".to_string())).await;
        assert_eq!(
            result.err(),
            Some(CacheError::Source("kkk not exist".to_string()))
        );
    }

    #[tokio::test]
    async fn test_api_handler_returns_raw_bytes() {
        let response = api_handler(
            State(test_state()),
            Path("scores".to_string()),
            Query(ApiQuery {
                key: "Tom".to_string(),
            }),
        )
        .await
        .unwrap();

        assert_eq!(body_bytes(response).await, b"630".to_vec());
    }

    #[tokio::test]
    async fn test_stats_handler_counts_loads() {
        let state = test_state();
        let cache = state.registry.get("scores").unwrap();
        assert_eq!(cache.get("Tom").await, Ok(ByteView::from("630")));
        cache.get("Tom").await.unwrap();

        let response = stats_handler(State(state), Path("scores".to_string()))
            .await
            .unwrap();

        assert_eq!(response.hits, 1);
        assert_eq!(response.source_loads, 1);
        assert_eq!(response.total_entries, 1);
    }

    #[tokio::test]
    async fn test_health_handler() {
        let response = health_handler(State(test_state())).await;
        assert_eq!(response.status, "healthy");
        assert_eq!(response.namespaces, vec!["scores".to_string()]);
    }
}
