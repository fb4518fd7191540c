//! Per-pair explanation.

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use repurx_common::{EntityKind, RepurxError};
use serde::Deserialize;

use crate::error::ApiError;
use crate::handlers::{required_param, resolve_disease};
use crate::state::SharedState;

#[derive(Debug, Deserialize, Default)]
pub struct ExplainQuery {
    pub disease: Option<String>,
    /// Drug id, or a drug name as a fallback.
    pub drug_id: Option<String>,
}

/// GET /explain?disease=&drug_id=
pub async fn explain(
    State(state): State<SharedState>,
    Query(params): Query<ExplainQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let disease_query = required_param(&params.disease, "disease")?;
    let drug_query = required_param(&params.drug_id, "drug_id")?;

    let snapshot = state.engine.snapshot();
    let store = snapshot.store();
    let disease = resolve_disease(store, disease_query)?;
    let drug = store
        .drug(drug_query)
        .or_else(|| store.drug_by_name(drug_query))
        .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Drug.namespaced(drug_query)))?;

    let explanation = snapshot.explainer().explain(&drug.drug_id, &disease.disease_id)?;
    Ok(Json(explanation))
}
