//! Integration Tests for API Endpoints
//!
//! Tests full request/response cycle for each endpoint.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use peer_cache::{
    create_router,
    peer::{FetchResponse, DEFAULT_BASE_PATH},
    AppState, CacheRegistry, SourceFn,
};
use prost::Message;
use serde_json::Value;
use tower::ServiceExt;

// == Helper Functions ==

fn create_test_app(loads: Arc<AtomicUsize>) -> Router {
    let registry = Arc::new(CacheRegistry::new());
    registry.create(
        "scores",
        2 << 10,
        Arc::new(SourceFn(move |key: &str| {
            loads.fetch_add(1, Ordering::SeqCst);
            match key {
                "Tom" => Ok(b"630".to_vec()),
                "Jack" => Ok(b"589".to_vec()),
                _ => Err(anyhow::anyhow!("{} not exist", key)),
            }
        })),
    );
    create_router(AppState::new(registry), DEFAULT_BASE_PATH)
}

async fn get(app: &Router, uri: &str) -> axum::response::Response {
    app.clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn body_to_bytes(body: Body) -> Vec<u8> {
    axum::body::to_bytes(body, usize::MAX).await.unwrap().to_vec()
}

async fn body_to_json(body: Body) -> Value {
    serde_json::from_slice(&body_to_bytes(body).await).unwrap()
}

// == Peer Endpoint Tests ==

#[tokio::test]
async fn test_peer_endpoint_success() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    let response = get(&app, "/_peercache/scores/Tom").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    let bytes = body_to_bytes(response.into_body()).await;
    let decoded = FetchResponse::decode(bytes.as_slice()).unwrap();
    assert_eq!(decoded.value, b"630".to_vec());
}

#[tokio::test]
async fn test_peer_endpoint_caches_value() {
    let loads = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(loads.clone());

    assert_eq!(get(&app, "/_peercache/scores/Tom").await.status(), StatusCode::OK);
    assert_eq!(get(&app, "/_peercache/scores/Tom").await.status(), StatusCode::OK);

    assert_eq!(loads.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_peer_endpoint_unknown_namespace() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    let response = get(&app, "/_peercache/ages/Tom").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("ages"));
}

#[tokio::test]
async fn test_peer_endpoint_source_error() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    let response = get(&app, "/_peercache/scores/kkk").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"].as_str().unwrap(), "kkk not exist");
}

#[tokio::test]
async fn test_peer_endpoint_malformed_path() {
    let loads = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(loads.clone());

    let response = get(&app, "/_peercache/scores").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_peer_endpoint_escaped_key() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    // "my key" is not in the data source; the decoded key reaches it intact
    let response = get(&app, "/_peercache/scores/my%20key").await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["error"].as_str().unwrap(), "my key not exist");
}

// == Client API Tests ==

#[tokio::test]
async fn test_api_endpoint_returns_raw_value() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    let response = get(&app, "/api/scores?key=Jack").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_to_bytes(response.into_body()).await, b"589".to_vec());
}

#[tokio::test]
async fn test_api_endpoint_empty_key() {
    let loads = Arc::new(AtomicUsize::new(0));
    let app = create_test_app(loads.clone());

    let response = get(&app, "/api/scores?key=").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_to_json(response.into_body()).await;
    assert!(json.get("error").is_some());
    assert_eq!(loads.load(Ordering::SeqCst), 0);
}

// == STATS Endpoint Tests ==

#[tokio::test]
async fn test_stats_endpoint() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    // miss + load, then hit
    get(&app, "/api/scores?key=Tom").await;
    get(&app, "/api/scores?key=Tom").await;
    // miss + failed load
    get(&app, "/api/scores?key=kkk").await;

    let response = get(&app, "/stats/scores").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["namespace"].as_str().unwrap(), "scores");
    assert_eq!(json["hits"].as_u64().unwrap(), 1);
    assert_eq!(json["misses"].as_u64().unwrap(), 2);
    assert_eq!(json["total_entries"].as_u64().unwrap(), 1);
    assert_eq!(json["used_bytes"].as_u64().unwrap(), 6);
    assert_eq!(json["source_loads"].as_u64().unwrap(), 1);
    assert_eq!(json["source_failures"].as_u64().unwrap(), 1);
    assert!(json.get("hit_rate").is_some());
}

// == HEALTH Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_app(Arc::new(AtomicUsize::new(0)));

    let response = get(&app, "/health").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"].as_str().unwrap(), "healthy");
    assert!(json.get("timestamp").is_some());
    assert_eq!(json["namespaces"][0].as_str().unwrap(), "scores");
}
