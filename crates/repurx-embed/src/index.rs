//! Per-entity vectors and cosine similarity between a drug and a disease.

use std::collections::HashMap;
use std::time::Instant;

use repurx_common::{Disease, Drug, EntityKind, RepurxError, Result};
use tracing::debug;

use crate::embedder::TextEmbedder;
use crate::error::EmbedError;

/// Immutable map from entity id to embedding vector. Drugs are embedded from
/// their indication text, diseases from name plus synonyms.
#[derive(Debug, Clone)]
pub struct EmbeddingIndex {
    dimension: usize,
    drugs: HashMap<String, Vec<f32>>,
    diseases: HashMap<String, Vec<f32>>,
}

impl EmbeddingIndex {
    pub fn build(drugs: &[Drug], diseases: &[Disease], embedder: &dyn TextEmbedder) -> Result<Self> {
        let start = Instant::now();
        let dimension = embedder.dimension();

        let drug_texts: Vec<&str> = drugs.iter().map(|d| d.indications_text.as_str()).collect();
        let drug_vectors = embedder.embed_batch(&drug_texts)?;

        let disease_texts: Vec<String> = diseases.iter().map(|d| d.descriptive_text()).collect();
        let disease_refs: Vec<&str> = disease_texts.iter().map(String::as_str).collect();
        let disease_vectors = embedder.embed_batch(&disease_refs)?;

        let drugs = collect(
            EntityKind::Drug,
            drugs.iter().map(|d| d.drug_id.as_str()),
            drug_vectors,
            dimension,
        )?;
        let diseases = collect(
            EntityKind::Disease,
            diseases.iter().map(|d| d.disease_id.as_str()),
            disease_vectors,
            dimension,
        )?;

        debug!(
            embedder = embedder.name(),
            dimension,
            drugs = drugs.len(),
            diseases = diseases.len(),
            "Embedding index built in {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self { dimension, drugs, diseases })
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn drug_vector(&self, drug_id: &str) -> Option<&[f32]> {
        self.drugs.get(drug_id).map(Vec::as_slice)
    }

    pub fn disease_vector(&self, disease_id: &str) -> Option<&[f32]> {
        self.diseases.get(disease_id).map(Vec::as_slice)
    }

    /// Cosine similarity in `[-1, 1]`; 0 when either vector is all zeros.
    pub fn raw_similarity(&self, drug_id: &str, disease_id: &str) -> Result<f64> {
        let drug = self
            .drug_vector(drug_id)
            .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Drug.namespaced(drug_id)))?;
        let disease = self
            .disease_vector(disease_id)
            .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Disease.namespaced(disease_id)))?;
        Ok(cosine(drug, disease))
    }

    /// Cosine similarity clipped to `[0, 1]`.
    pub fn similarity(&self, drug_id: &str, disease_id: &str) -> Result<f64> {
        Ok(self.raw_similarity(drug_id, disease_id)?.clamp(0.0, 1.0))
    }
}

fn collect<'a>(
    kind: EntityKind,
    ids: impl Iterator<Item = &'a str>,
    vectors: Vec<Vec<f32>>,
    dimension: usize,
) -> Result<HashMap<String, Vec<f32>>> {
    let mut map = HashMap::with_capacity(vectors.len());
    let mut vectors = vectors.into_iter();
    for id in ids {
        let vector = vectors
            .next()
            .ok_or_else(|| RepurxError::Embedding(format!("no vector for {}", kind.namespaced(id))))?;
        if vector.len() != dimension {
            return Err(EmbedError::Dimension {
                id: kind.namespaced(id),
                expected: dimension,
                got: vector.len(),
            }
            .into());
        }
        map.insert(id.to_string(), vector);
    }
    Ok(map)
}

/// Cosine similarity accumulated in f64. Zero-norm inputs give 0, never NaN.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (x as f64, y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    (dot / (na.sqrt() * nb.sqrt())).clamp(-1.0, 1.0)
}
