//! Error types for the performance core
//!
//! Provides unified error handling using thiserror. Cache operations never
//! fail; only producer failures cross the fetch orchestrator boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the performance core and its inspection API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Key not found in cache (or never registered with the orchestrator)
    #[error("Key not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The producer kept failing until the retry budget was spent
    #[error("Fetch failed for '{key}' after {attempts} attempt(s): {message}")]
    FetchFailed {
        key: String,
        attempts: u32,
        message: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Builds a `FetchFailed` from the last producer error.
    pub fn fetch_failed(key: impl Into<String>, attempts: u32, source: &anyhow::Error) -> Self {
        CacheError::FetchFailed {
            key: key.into(),
            attempts,
            message: format!("{:#}", source),
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::NotFound(_) => StatusCode::NOT_FOUND,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::FetchFailed { .. } => StatusCode::BAD_GATEWAY,
            CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the performance core.
pub type Result<T> = std::result::Result<T, CacheError>;
