//! Service banner, health, graph statistics and snapshot reload.

use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use repurx_kg::GraphStats;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub healthy: bool,
    pub generation: u64,
    pub built_at: DateTime<Utc>,
    pub started_at: DateTime<Utc>,
    pub drugs_count: usize,
    pub diseases_count: usize,
    pub genes_count: usize,
    pub graph_nodes: usize,
    pub graph_edges: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub hits: u64,
    pub misses: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StatsResponse {
    pub generation: u64,
    pub graph: GraphStats,
    pub embedding_cache: CacheStats,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReloadResponse {
    pub status: String,
    pub generation: u64,
    pub drugs_count: usize,
    pub diseases_count: usize,
}

/// GET /
pub async fn index() -> Json<Value> {
    Json(json!({
        "service": "repurx",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "GET /health",
            "GET /rank?disease=&k=&w_graph=&w_text=",
            "GET /explain?disease=&drug_id=",
            "GET /drugs",
            "GET /drugs/{id}",
            "GET /diseases",
            "GET /diseases/{id}",
            "GET /search/diseases?q=",
            "GET /stats",
            "POST /admin/reload",
        ],
    }))
}

/// GET /health
pub async fn health(State(state): State<SharedState>) -> Json<HealthResponse> {
    let snapshot = state.engine.snapshot();
    let store = snapshot.store();
    Json(HealthResponse {
        status: "healthy".to_string(),
        healthy: true,
        generation: snapshot.generation(),
        built_at: snapshot.built_at(),
        started_at: state.started_at,
        drugs_count: store.drugs().len(),
        diseases_count: store.diseases().len(),
        genes_count: store.genes().len(),
        graph_nodes: snapshot.graph().node_count(),
        graph_edges: snapshot.graph().edge_count(),
    })
}

/// GET /stats
pub async fn stats(State(state): State<SharedState>) -> Json<StatsResponse> {
    let snapshot = state.engine.snapshot();
    let cache = state.engine.cache();
    Json(StatsResponse {
        generation: snapshot.generation(),
        graph: snapshot.graph().stats(),
        embedding_cache: CacheStats { entries: cache.len(), hits: cache.hits(), misses: cache.misses() },
    })
}

/// POST /admin/reload
///
/// Re-reads the seed tables and swaps in a fresh snapshot. Queries in
/// flight keep the snapshot they started with; on failure nothing changes.
pub async fn reload(State(state): State<SharedState>) -> Result<impl IntoResponse, ApiError> {
    let worker = Arc::clone(&state);
    let generation = tokio::task::spawn_blocking(move || -> Result<u64, ApiError> {
        let store = worker.loader().load()?;
        Ok(worker.engine.reload(store)?)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("reload task failed: {e}")))??;

    let snapshot = state.engine.snapshot();
    info!(generation, data_dir = %state.config.data.dir.display(), "Reloaded seed data");

    Ok(Json(ReloadResponse {
        status: "reloaded".to_string(),
        generation,
        drugs_count: snapshot.store().drugs().len(),
        diseases_count: snapshot.store().diseases().len(),
    }))
}
