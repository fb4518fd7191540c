/// Core entity types loaded from the seed tables.
/// Records are immutable once loaded; the graph and the embedding index
/// only ever borrow them.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Entity kinds / namespaced ids
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Drug,
    Disease,
    Gene,
}

impl EntityKind {
    /// Namespace prefix used for graph node ids.
    pub fn prefix(&self) -> &'static str {
        match self {
            EntityKind::Drug    => "drug",
            EntityKind::Disease => "dis",
            EntityKind::Gene    => "gene",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Drug    => "drug",
            EntityKind::Disease => "disease",
            EntityKind::Gene    => "gene",
        }
    }

    /// Build the namespaced id, e.g. `drug:D001`.
    pub fn namespaced(&self, id: &str) -> String {
        format!("{}:{}", self.prefix(), id)
    }

    /// Split a namespaced id back into kind and raw id.
    pub fn parse_namespaced(node_id: &str) -> Option<(EntityKind, &str)> {
        let (prefix, id) = node_id.split_once(':')?;
        let kind = match prefix {
            "drug" => EntityKind::Drug,
            "dis"  => EntityKind::Disease,
            "gene" => EntityKind::Gene,
            _      => return None,
        };
        Some((kind, id))
    }
}

// ---------------------------------------------------------------------------
// Drug
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Drug {
    pub drug_id: String,
    pub name: String,
    pub atc_code: Option<String>,
    pub indications_text: String,
}

// ---------------------------------------------------------------------------
// Disease
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Disease {
    pub disease_id: String,
    pub name: String,
    pub synonyms: Vec<String>,
}

impl Disease {
    /// Name followed by all synonyms, space separated.
    /// This is the text embedded for the disease side of the similarity.
    pub fn descriptive_text(&self) -> String {
        let mut text = self.name.clone();
        for synonym in &self.synonyms {
            text.push(' ');
            text.push_str(synonym);
        }
        text
    }
}

// ---------------------------------------------------------------------------
// Gene
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Gene {
    pub gene_symbol: String,
}

impl Gene {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self { gene_symbol: symbol.into() }
    }
}

// ---------------------------------------------------------------------------
// Relations
// ---------------------------------------------------------------------------

/// Known indication: drug is used for disease.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugDiseaseRelation {
    pub drug_id: String,
    pub disease_id: String,
    pub evidence: Option<String>,
}

/// Drug targets gene.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrugGeneRelation {
    pub drug_id: String,
    pub gene_symbol: String,
    pub note: Option<String>,
}
