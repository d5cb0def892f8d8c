//! API Handlers
//!
//! HTTP request handlers for the cache inspection endpoints.

use std::time::Duration;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;

use crate::cache::{CacheStore, SharedStore};
use crate::error::{CacheError, Result};
use crate::models::{
    GetResponse, HealthResponse, KeysResponse, MutationResponse, SetRequest, StatsResponse,
};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// JSON-valued cache store, shared with the cleanup task
    pub cache: SharedStore<Value>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(cache: CacheStore<Value>) -> Self {
        Self {
            cache: cache.into_shared(),
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(CacheStore::new(config.cache_options()))
    }
}

/// Handler for PUT /cache
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<MutationResponse>> {
    if let Some(error_msg) = req.validate() {
        return Err(CacheError::InvalidRequest(error_msg));
    }

    let ttl = req.ttl_ms.map(Duration::from_millis);
    state.cache.write().await.set(req.key.clone(), req.value, ttl);

    Ok(Json(MutationResponse::set(req.key)))
}

/// Handler for GET /cache/:key
///
/// Counts as a regular read: updates hit/miss stats and recency.
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let mut cache = state.cache.write().await;
    if cache.get(&key).is_none() {
        return Err(CacheError::NotFound(key));
    }

    let entry = cache
        .peek(&key)
        .ok_or_else(|| CacheError::Internal(format!("entry '{}' vanished after read", key)))?;
    Ok(Json(GetResponse::from_entry(key, entry)))
}

/// Handler for DELETE /cache/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<MutationResponse>> {
    if state.cache.write().await.delete(&key) {
        Ok(Json(MutationResponse::deleted(key)))
    } else {
        Err(CacheError::NotFound(key))
    }
}

/// Handler for DELETE /cache
pub async fn clear_handler(State(state): State<AppState>) -> Json<MutationResponse> {
    state.cache.write().await.clear();
    Json(MutationResponse::cleared())
}

/// Handler for GET /keys
pub async fn keys_handler(State(state): State<AppState>) -> Json<KeysResponse> {
    let keys = state.cache.read().await.keys();
    Json(KeysResponse::new(keys))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let cache = state.cache.read().await;
    Json(StatsResponse {
        stats: cache.stats(),
        max_entries: cache.options().max_entries,
    })
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
