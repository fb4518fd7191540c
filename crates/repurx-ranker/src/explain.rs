//! Per-pair explanations: graph paths, shared vocabulary and known evidence.

use repurx_common::text::content_tokens;
use repurx_common::{EntityKind, RepurxError, Result};
use repurx_kg::{GraphPath, Hop};
use serde::{Deserialize, Serialize};

use crate::snapshot::Snapshot;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathEvidence {
    /// 1-based position in the returned list.
    pub path_id: usize,
    pub path: Vec<String>,
    pub length: usize,
    pub explanation: String,
    pub hops: Vec<Hop>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TextOverlap {
    pub overlapping_tokens: Vec<String>,
    pub overlap_count: usize,
    /// `overlap_count` over the number of distinct drug tokens.
    pub overlap_ratio: f64,
    pub drug_tokens: Vec<String>,
    pub disease_tokens: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnownEvidence {
    pub has_known_evidence: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Explanation {
    pub drug_id: String,
    pub drug_name: String,
    pub disease_id: String,
    pub disease_name: String,
    pub graph_paths: Vec<PathEvidence>,
    pub text_overlaps: TextOverlap,
    pub known_evidence: KnownEvidence,
}

pub struct Explainer<'a> {
    snapshot: &'a Snapshot,
}

impl<'a> Explainer<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self { snapshot }
    }

    pub fn explain(&self, drug_id: &str, disease_id: &str) -> Result<Explanation> {
        let store = self.snapshot.store();
        let drug = store
            .drug(drug_id)
            .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Drug.namespaced(drug_id)))?;
        let disease = store
            .disease(disease_id)
            .ok_or_else(|| RepurxError::UnknownEntity(EntityKind::Disease.namespaced(disease_id)))?;

        let config = self.snapshot.config();
        let graph_paths = self
            .snapshot
            .graph()
            .shortest_paths(
                &EntityKind::Drug.namespaced(drug_id),
                &EntityKind::Disease.namespaced(disease_id),
                config.max_path_length,
                config.max_paths,
            )
            .into_iter()
            .enumerate()
            .map(|(i, path)| path_evidence(i + 1, path))
            .collect();

        let text_overlaps = text_overlap(&drug.indications_text, &disease.descriptive_text());

        let evidence = store.indication(drug_id, disease_id);
        let known_evidence = KnownEvidence {
            has_known_evidence: evidence.is_some(),
            evidence: evidence.and_then(|r| r.evidence.clone()),
        };

        Ok(Explanation {
            drug_id: drug.drug_id.clone(),
            drug_name: drug.name.clone(),
            disease_id: disease.disease_id.clone(),
            disease_name: disease.name.clone(),
            graph_paths,
            text_overlaps,
            known_evidence,
        })
    }
}

fn path_evidence(path_id: usize, path: GraphPath) -> PathEvidence {
    let explanation = path.hops.iter().map(describe_hop).collect::<Vec<_>>().join(" → ");
    PathEvidence {
        path_id,
        path: path.node_ids().into_iter().map(str::to_string).collect(),
        length: path.len(),
        explanation,
        hops: path.hops,
    }
}

/// `"metformin targets AMPK (activator)"`,
/// `"AMPK is associated with parkinson's disease (via resveratrol)"`.
pub fn describe_hop(hop: &Hop) -> String {
    let mut text = format!("{} {} {}", hop.source_label, hop.relation.verb(), hop.target_label);
    if let Some(annotation) = &hop.annotation {
        text.push_str(&format!(" ({annotation})"));
    } else if let Some(via) = &hop.via_label {
        text.push_str(&format!(" (via {via})"));
    }
    text
}

pub fn text_overlap(drug_text: &str, disease_text: &str) -> TextOverlap {
    let drug_tokens = content_tokens(drug_text);
    let disease_tokens = content_tokens(disease_text);
    let overlapping_tokens: Vec<String> = drug_tokens.intersection(&disease_tokens).cloned().collect();
    let overlap_count = overlapping_tokens.len();
    let overlap_ratio = if drug_tokens.is_empty() {
        0.0
    } else {
        overlap_count as f64 / drug_tokens.len() as f64
    };
    TextOverlap {
        overlapping_tokens,
        overlap_count,
        overlap_ratio,
        drug_tokens: drug_tokens.into_iter().collect(),
        disease_tokens: disease_tokens.into_iter().collect(),
    }
}
