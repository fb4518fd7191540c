//! Drug and disease lookup, plus disease search.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use repurx_common::{Disease, Drug, DrugGeneRelation, EntityKind, RepurxError};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::handlers::required_param;
use crate::state::SharedState;

#[derive(Debug, Serialize, Deserialize)]
pub struct DrugList {
    pub count: usize,
    pub drugs: Vec<Drug>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiseaseList {
    pub count: usize,
    pub diseases: Vec<Disease>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct IndicationSummary {
    pub disease_id: String,
    pub disease_name: String,
    pub evidence: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrugDetail {
    #[serde(flatten)]
    pub drug: Drug,
    pub indications: Vec<IndicationSummary>,
    pub targets: Vec<DrugGeneRelation>,
    /// Namespaced ids one hop away in the knowledge graph.
    pub graph_neighbors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DrugSummary {
    pub drug_id: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiseaseDetail {
    #[serde(flatten)]
    pub disease: Disease,
    pub known_drugs: Vec<DrugSummary>,
}

#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub query: String,
    pub count: usize,
    pub results: Vec<Disease>,
}

/// GET /drugs
pub async fn list_drugs(State(state): State<SharedState>) -> Json<DrugList> {
    let snapshot = state.engine.snapshot();
    let drugs = snapshot.store().drugs().to_vec();
    Json(DrugList { count: drugs.len(), drugs })
}

/// GET /drugs/{id}
pub async fn get_drug(
    State(state): State<SharedState>,
    Path(drug_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.engine.snapshot();
    let store = snapshot.store();
    let drug = store
        .drug(&drug_id)
        .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Drug.namespaced(&drug_id)))?;

    let indications = store
        .drug_disease()
        .iter()
        .filter(|r| r.drug_id == drug.drug_id)
        .filter_map(|r| {
            store.disease(&r.disease_id).map(|d| IndicationSummary {
                disease_id: d.disease_id.clone(),
                disease_name: d.name.clone(),
                evidence: r.evidence.clone(),
            })
        })
        .collect();

    let graph_neighbors = snapshot
        .graph()
        .neighbors(&EntityKind::Drug.namespaced(&drug.drug_id), None)
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(DrugDetail {
        drug: drug.clone(),
        indications,
        targets: store.genes_for_drug(&drug.drug_id).into_iter().cloned().collect(),
        graph_neighbors,
    }))
}

/// GET /diseases
pub async fn list_diseases(State(state): State<SharedState>) -> Json<DiseaseList> {
    let snapshot = state.engine.snapshot();
    let diseases = snapshot.store().diseases().to_vec();
    Json(DiseaseList { count: diseases.len(), diseases })
}

/// GET /diseases/{id}
pub async fn get_disease(
    State(state): State<SharedState>,
    Path(disease_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let snapshot = state.engine.snapshot();
    let store = snapshot.store();
    let disease = store
        .disease(&disease_id)
        .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Disease.namespaced(&disease_id)))?;

    let known_drugs = store
        .drugs_for_disease(&disease.disease_id)
        .into_iter()
        .map(|d| DrugSummary { drug_id: d.drug_id.clone(), name: d.name.clone() })
        .collect();

    Ok(Json(DiseaseDetail { disease: disease.clone(), known_drugs }))
}

/// GET /search/diseases?q=
pub async fn search_diseases(
    State(state): State<SharedState>,
    Query(params): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let query = required_param(&params.q, "q")?;
    let snapshot = state.engine.snapshot();
    let results: Vec<Disease> = snapshot.store().search_diseases(query).into_iter().cloned().collect();
    Ok(Json(SearchResponse { query: query.to_string(), count: results.len(), results }))
}
