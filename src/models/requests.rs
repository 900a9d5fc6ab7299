//! Request DTOs for the client API
//!
//! Defines the query parameters accepted by the client endpoint.

use serde::Deserialize;

/// Query string for the client lookup (GET /api/:namespace?key=...)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiQuery {
    /// The key to look up; a missing key is treated as empty and rejected
    #[serde(default)]
    pub key: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_query_deserialize() {
        let query: ApiQuery = serde_json::from_str(r#"{"key": "Tom"}"#).unwrap();
        assert_eq!(query.key, "Tom");
    }

    #[test]
    fn test_api_query_missing_key() {
        let query: ApiQuery = serde_json::from_str("{}").unwrap();
        assert!(query.key.is_empty());
    }
}
