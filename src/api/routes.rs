//! API Routes
//!
//! Configures the Axum router with the peer endpoint and the client API.

use axum::{routing::get, Router};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{api_handler, health_handler, peer_handler, stats_handler, AppState};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET <base_path><namespace>/<key>` - Peer lookup, protobuf response
/// - `GET /api/:namespace?key=...` - Client lookup, raw bytes
/// - `GET /stats/:namespace` - Namespace statistics
/// - `GET /health` - Health check endpoint
///
/// `base_path` must start and end with `/`.
pub fn create_router(state: AppState, base_path: &str) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(&format!("{}*path", base_path), get(peer_handler))
        .route("/api/:namespace", get(api_handler))
        .route("/stats/:namespace", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
