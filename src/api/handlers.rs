//! API Handlers
//!
//! HTTP request handlers for each cache server endpoint.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde_json::Value;

use crate::backend::{Backend, MemoryBackend};
use crate::cache::{CacheStore, WriteOptions};
use crate::error::{CacheError, Result};
use crate::models::{
    validate_key, CleanupResponse, CounterRequest, CounterResponse, DeleteMatchedResponse,
    DeleteResponse, ExistsResponse, HealthResponse, PatternQuery, ReadResponse, StatsResponse,
    WriteRequest, WriteResponse,
};

/// Application state shared across all handlers.
///
/// The store synchronizes itself, so handlers share it through a plain Arc.
#[derive(Clone)]
pub struct AppState {
    /// Shared cache store
    pub store: Arc<CacheStore<MemoryBackend>>,
}

impl AppState {
    /// Creates a new AppState with the given cache store.
    pub fn new(store: CacheStore<MemoryBackend>) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Creates a new AppState from configuration over a fresh in-memory backend.
    pub fn from_config(config: &crate::config::Config) -> Result<Self> {
        let store = CacheStore::new(Arc::new(MemoryBackend::new()), &config.store_config())?;
        Ok(Self::new(store))
    }
}

fn checked_key(key: String) -> Result<String> {
    match validate_key(&key) {
        Some(error_msg) => Err(CacheError::InvalidRequest(error_msg)),
        None => Ok(key),
    }
}

/// Handler for PUT /entries/:key
pub async fn write_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<WriteRequest>,
) -> Result<Json<WriteResponse>> {
    let key = checked_key(key)?;
    let options = WriteOptions {
        expires_in: req.expires_in.map(Duration::from_secs),
    };

    state.store.write(&key, &req.value, &options).await?;

    Ok(Json(WriteResponse::new(key)))
}

/// Handler for GET /entries/:key
pub async fn read_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ReadResponse>> {
    let key = checked_key(key)?;

    match state.store.read::<Value>(&key).await? {
        Some(value) => Ok(Json(ReadResponse::new(key, value))),
        None => Err(CacheError::NotFound(key)),
    }
}

/// Handler for DELETE /entries/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    let key = checked_key(key)?;
    let deleted = state.store.delete(&key).await?;

    Ok(Json(DeleteResponse::new(key, deleted)))
}

/// Handler for GET /entries/:key/exists
pub async fn exists_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<ExistsResponse>> {
    let key = checked_key(key)?;
    let exists = state.store.exists(&key).await?;

    Ok(Json(ExistsResponse { key, exists }))
}

/// Handler for POST /entries/:key/increment
pub async fn increment_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    let key = checked_key(key)?;
    let value = state.store.increment(&key, req.amount).await?;

    Ok(Json(CounterResponse { key, value }))
}

/// Handler for POST /entries/:key/decrement
pub async fn decrement_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Json(req): Json<CounterRequest>,
) -> Result<Json<CounterResponse>> {
    let key = checked_key(key)?;
    let value = state.store.decrement(&key, req.amount).await?;

    Ok(Json(CounterResponse { key, value }))
}

/// Handler for DELETE /entries
///
/// Deletes entries matching `?pattern=`, or clears the namespace without one.
pub async fn delete_matched_handler(
    State(state): State<AppState>,
    Query(query): Query<PatternQuery>,
) -> Result<Json<DeleteMatchedResponse>> {
    match query.pattern {
        Some(pattern) => {
            let deleted = state.store.delete_matched(&pattern).await?;
            Ok(Json(DeleteMatchedResponse {
                pattern: Some(pattern),
                deleted: Some(deleted),
            }))
        }
        None => {
            state.store.clear().await?;
            Ok(Json(DeleteMatchedResponse {
                pattern: None,
                deleted: None,
            }))
        }
    }
}

/// Handler for POST /cleanup
pub async fn cleanup_handler(State(state): State<AppState>) -> Json<CleanupResponse> {
    Json(CleanupResponse {
        removed: state.store.cleanup(),
    })
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    Json(StatsResponse::from(state.store.stats()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.store.backend().backend_name()))
}
