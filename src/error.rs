//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Cache Error Enum ==
/// Unified error type returned by cache lookups and the HTTP surface.
///
/// `Clone` so that every caller coalesced onto one fetch receives the same outcome.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Invalid request data (empty key, malformed path)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No cache registered under the namespace
    #[error("No such cache: {0}")]
    NamespaceNotFound(String),

    /// The authoritative data source failed; carries its message verbatim
    #[error("{0}")]
    Source(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::NamespaceNotFound(_) => StatusCode::NOT_FOUND,
            CacheError::Source(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_is_verbatim() {
        let err = CacheError::Source("missingKey not exist".to_string());
        assert_eq!(err.to_string(), "missingKey not exist");
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (CacheError::InvalidRequest("x".into()), StatusCode::BAD_REQUEST),
            (CacheError::NamespaceNotFound("x".into()), StatusCode::NOT_FOUND),
            (CacheError::Source("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
            (CacheError::Internal("x".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
