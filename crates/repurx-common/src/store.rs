//! In-memory entity store.
//!
//! Holds the validated seed collections plus id/name indexes. Built once per
//! load and shared read-only by the graph, the embedding index and the
//! serving layer.

use std::collections::{BTreeSet, HashMap};

use crate::entities::{Disease, Drug, DrugDiseaseRelation, DrugGeneRelation, Gene};
use crate::error::{RepurxError, Result};

/// Minimum word-Jaccard score for a fuzzy disease match.
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    drugs: Vec<Drug>,
    diseases: Vec<Disease>,
    genes: Vec<Gene>,
    drug_disease: Vec<DrugDiseaseRelation>,
    drug_gene: Vec<DrugGeneRelation>,
    drug_index: HashMap<String, usize>,
    disease_index: HashMap<String, usize>,
}

impl EntityStore {
    /// Assemble a store from loaded collections.
    ///
    /// Genes are implicit: the gene set is every symbol referenced by a
    /// drug–gene relation, sorted. Duplicate drug or disease ids are rejected.
    pub fn new(
        drugs: Vec<Drug>,
        diseases: Vec<Disease>,
        drug_disease: Vec<DrugDiseaseRelation>,
        drug_gene: Vec<DrugGeneRelation>,
    ) -> Result<Self> {
        let mut drug_index = HashMap::with_capacity(drugs.len());
        for (i, drug) in drugs.iter().enumerate() {
            if drug_index.insert(drug.drug_id.clone(), i).is_some() {
                return Err(RepurxError::InvalidArgument(format!(
                    "duplicate drug id '{}'",
                    drug.drug_id
                )));
            }
        }

        let mut disease_index = HashMap::with_capacity(diseases.len());
        for (i, disease) in diseases.iter().enumerate() {
            if disease_index.insert(disease.disease_id.clone(), i).is_some() {
                return Err(RepurxError::InvalidArgument(format!(
                    "duplicate disease id '{}'",
                    disease.disease_id
                )));
            }
        }

        let genes: Vec<Gene> = drug_gene
            .iter()
            .map(|r| r.gene_symbol.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(Gene::new)
            .collect();

        Ok(Self {
            drugs,
            diseases,
            genes,
            drug_disease,
            drug_gene,
            drug_index,
            disease_index,
        })
    }

    pub fn drugs(&self) -> &[Drug] { &self.drugs }
    pub fn diseases(&self) -> &[Disease] { &self.diseases }
    pub fn genes(&self) -> &[Gene] { &self.genes }
    pub fn drug_disease(&self) -> &[DrugDiseaseRelation] { &self.drug_disease }
    pub fn drug_gene(&self) -> &[DrugGeneRelation] { &self.drug_gene }

    pub fn drug(&self, drug_id: &str) -> Option<&Drug> {
        self.drug_index.get(drug_id).map(|&i| &self.drugs[i])
    }

    pub fn disease(&self, disease_id: &str) -> Option<&Disease> {
        self.disease_index.get(disease_id).map(|&i| &self.diseases[i])
    }

    /// Case-insensitive lookup by drug name.
    pub fn drug_by_name(&self, name: &str) -> Option<&Drug> {
        let needle = name.trim().to_lowercase();
        self.drugs.iter().find(|d| d.name.to_lowercase() == needle)
    }

    /// Case-insensitive lookup by disease name.
    pub fn disease_by_name(&self, name: &str) -> Option<&Disease> {
        let needle = name.trim().to_lowercase();
        self.diseases.iter().find(|d| d.name.to_lowercase() == needle)
    }

    /// Resolve a free-text disease query.
    ///
    /// Tries, in order: disease id, exact name, substring containment in
    /// either direction, then best word-Jaccard score at or above
    /// [`FUZZY_MATCH_THRESHOLD`]. Ties keep the first disease in load order.
    pub fn match_disease(&self, query: &str) -> Option<&Disease> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        if let Some(d) = self.disease(query) {
            return Some(d);
        }
        if let Some(d) = self.disease_by_name(query) {
            return Some(d);
        }

        let needle = query.to_lowercase();
        if let Some(d) = self.diseases.iter().find(|d| {
            let name = d.name.to_lowercase();
            name.contains(&needle) || needle.contains(&name)
        }) {
            return Some(d);
        }

        let query_words: BTreeSet<&str> = needle.split_whitespace().collect();
        let mut best: Option<(&Disease, f64)> = None;
        for disease in &self.diseases {
            let name = disease.name.to_lowercase();
            let words: BTreeSet<&str> = name.split_whitespace().collect();
            let intersection = query_words.intersection(&words).count();
            if intersection == 0 {
                continue;
            }
            let union = query_words.union(&words).count();
            let score = intersection as f64 / union as f64;
            if score >= FUZZY_MATCH_THRESHOLD && best.map_or(true, |(_, s)| score > s) {
                best = Some((disease, score));
            }
        }
        best.map(|(d, _)| d)
    }

    /// Diseases whose name or any synonym contains the query (case-insensitive).
    pub fn search_diseases(&self, query: &str) -> Vec<&Disease> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.diseases
            .iter()
            .filter(|d| {
                d.name.to_lowercase().contains(&needle)
                    || d.synonyms.iter().any(|s| s.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Drugs with a known indication for the disease.
    pub fn drugs_for_disease(&self, disease_id: &str) -> Vec<&Drug> {
        self.drug_disease
            .iter()
            .filter(|r| r.disease_id == disease_id)
            .filter_map(|r| self.drug(&r.drug_id))
            .collect()
    }

    /// Diseases the drug is indicated for.
    pub fn diseases_for_drug(&self, drug_id: &str) -> Vec<&Disease> {
        self.drug_disease
            .iter()
            .filter(|r| r.drug_id == drug_id)
            .filter_map(|r| self.disease(&r.disease_id))
            .collect()
    }

    /// Gene relations for a drug, in load order.
    pub fn genes_for_drug(&self, drug_id: &str) -> Vec<&DrugGeneRelation> {
        self.drug_gene.iter().filter(|r| r.drug_id == drug_id).collect()
    }

    /// The recorded indication for a (drug, disease) pair, if any.
    pub fn indication(&self, drug_id: &str, disease_id: &str) -> Option<&DrugDiseaseRelation> {
        self.drug_disease
            .iter()
            .find(|r| r.drug_id == drug_id && r.disease_id == disease_id)
    }
}
