//! API Module
//!
//! HTTP handlers and routing for a cache node.
//!
//! # Endpoints
//! - `GET <base_path><namespace>/<key>` - Peer lookup used by other nodes
//! - `GET /api/:namespace?key=...` - Client lookup returning raw bytes
//! - `GET /stats/:namespace` - Namespace statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
