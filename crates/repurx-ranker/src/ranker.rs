//! Hybrid ranking of every drug against one disease.

use std::cmp::Ordering;

use repurx_common::{RepurxError, Result};
use serde::{Deserialize, Serialize};

use crate::normalise::minmax_slice;
use crate::snapshot::Snapshot;
use crate::weights::FusionWeights;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Candidate {
    pub drug_id: String,
    pub drug_name: String,
    /// Weighted sum of the graph and text scores.
    #[serde(rename = "score")]
    pub fused_score: f64,
    pub text_score: f64,
    pub graph_score: f64,
    /// Min-max of `fused_score` within the returned list.
    pub normalized_score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RankedList {
    pub disease_id: String,
    pub disease_name: String,
    pub k: usize,
    pub candidates: Vec<Candidate>,
}

impl RankedList {
    pub fn count(&self) -> usize {
        self.candidates.len()
    }
}

pub struct Ranker<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Ranker<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    /// Top `k` drugs for `disease_id`, best first.
    ///
    /// Ordering: fused score descending, then graph score descending, then
    /// drug id ascending. Returns `min(k, drug count)` candidates.
    pub fn rank(&self, disease_id: &str, k: usize, weights: FusionWeights) -> Result<RankedList> {
        if k == 0 {
            return Err(RepurxError::InvalidArgument("k must be at least 1".to_string()));
        }
        weights.validate()?;

        let store = self.snapshot.store();
        let disease = store
            .disease(disease_id)
            .ok_or_else(|| RepurxError::UnknownDisease(disease_id.to_string()))?;

        let graph_scores = self
            .snapshot
            .graph()
            .direct_scores_to_disease(disease_id, self.snapshot.config().max_path_length);
        let index = self.snapshot.index();

        let mut candidates = store
            .drugs()
            .iter()
            .map(|drug| {
                let graph_score = graph_scores.get(&drug.drug_id).copied().unwrap_or(0.0);
                let text_score = index.similarity(&drug.drug_id, disease_id)?;
                Ok(Candidate {
                    drug_id: drug.drug_id.clone(),
                    drug_name: drug.name.clone(),
                    fused_score: weights.fuse(graph_score, text_score),
                    text_score,
                    graph_score,
                    normalized_score: 0.0,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        candidates.sort_by(compare_candidates);
        candidates.truncate(k);

        let fused: Vec<f64> = candidates.iter().map(|c| c.fused_score).collect();
        for (candidate, norm) in candidates.iter_mut().zip(minmax_slice(&fused)) {
            candidate.normalized_score = norm;
        }

        Ok(RankedList {
            disease_id: disease.disease_id.clone(),
            disease_name: disease.name.clone(),
            k,
            candidates,
        })
    }
}

fn compare_candidates(a: &Candidate, b: &Candidate) -> Ordering {
    b.fused_score
        .total_cmp(&a.fused_score)
        .then_with(|| b.graph_score.total_cmp(&a.graph_score))
        .then_with(|| a.drug_id.cmp(&b.drug_id))
}
