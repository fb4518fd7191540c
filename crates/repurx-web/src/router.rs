//! Axum router: maps all URL paths to handlers.

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::CorsLayer,
    trace::TraceLayer,
    compression::CompressionLayer,
};
use std::sync::Arc;
use crate::state::{AppState, SharedState};
use crate::handlers::{
    rank::rank,
    explain::explain,
    entities::{list_drugs, get_drug, list_diseases, get_disease, search_diseases},
    system::{index, health, stats, reload},
};

/// Build and return the full Axum router.
pub fn build_router(state: AppState) -> Router {
    let shared: SharedState = Arc::new(state);

    Router::new()
        .route("/",        get(index))
        .route("/health",  get(health))
        .route("/stats",   get(stats))

        // Queries
        .route("/rank",    get(rank))
        .route("/explain", get(explain))

        // Entities
        .route("/drugs",           get(list_drugs))
        .route("/drugs/{id}",      get(get_drug))
        .route("/diseases",        get(list_diseases))
        .route("/diseases/{id}",   get(get_disease))
        .route("/search/diseases", get(search_diseases))

        // Admin
        .route("/admin/reload", post(reload))

        // Middleware
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(shared)
}
