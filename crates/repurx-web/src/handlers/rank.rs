//! Candidate ranking for a disease.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use repurx_ranker::{Candidate, FusionWeights};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::{required_param, resolve_disease};
use crate::state::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct RankQuery {
    pub disease: Option<String>,
    pub k: Option<usize>,
    pub w_graph: Option<f64>,
    pub w_text: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankResponse {
    pub query: String,
    /// Name of the resolved disease.
    pub disease: String,
    pub disease_id: String,
    pub k: usize,
    pub count: usize,
    pub weights: FusionWeights,
    pub generation: u64,
    pub candidates: Vec<Candidate>,
}

/// GET /rank?disease=&k=&w_graph=&w_text=
pub async fn rank(
    State(state): State<SharedState>,
    Query(params): Query<RankQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = required_param(&params.disease, "disease")?;

    let max_k = state.config.server.max_k;
    let k = params.k.unwrap_or(state.config.server.default_k);
    if k == 0 || k > max_k {
        return Err(ApiError::BadRequest(format!("k must be between 1 and {max_k}, got {k}")));
    }

    // one snapshot for resolution and ranking
    let snapshot = state.engine.snapshot();
    let disease = resolve_disease(snapshot.store(), query)?;

    let defaults = FusionWeights::from(snapshot.config());
    let weights = FusionWeights {
        graph: params.w_graph.unwrap_or(defaults.graph),
        text: params.w_text.unwrap_or(defaults.text),
    };

    let list = snapshot.ranker().rank(&disease.disease_id, k, weights)?;

    Ok(Json(RankResponse {
        query: query.to_string(),
        disease: list.disease_name,
        disease_id: list.disease_id,
        k,
        count: list.candidates.len(),
        weights,
        generation: snapshot.generation(),
        candidates: list.candidates,
    }))
}
