//! Graph construction.

use std::collections::HashMap;

use repurx_common::entities::{Disease, Drug, DrugDiseaseRelation, DrugGeneRelation, EntityKind, Gene};
use repurx_common::error::{RepurxError, Result};
use repurx_common::store::EntityStore;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Arena index of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIdx(u32);

impl NodeIdx {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Typed edge kinds.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// drug → disease, from the known-indication table
    Treats,
    /// drug → gene
    Targets,
    /// gene → disease, propagated through a drug that both targets the gene
    /// and treats the disease
    AssociatedWith,
}

impl RelationKind {
    /// Edge weight assigned when the source table carries none.
    pub fn default_weight(&self) -> f64 {
        match self {
            RelationKind::Treats         => 2.0,
            RelationKind::Targets        => 1.0,
            RelationKind::AssociatedWith => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RelationKind::Treats         => "treats",
            RelationKind::Targets        => "targets",
            RelationKind::AssociatedWith => "associated_with",
        }
    }

    /// Verb used in prose renderings of a hop.
    pub fn verb(&self) -> &'static str {
        match self {
            RelationKind::Treats         => "treats",
            RelationKind::Targets        => "targets",
            RelationKind::AssociatedWith => "is associated with",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Namespaced id, e.g. `gene:AMPK`.
    pub id: String,
    pub kind: EntityKind,
    /// Raw entity id (drug id, disease id or gene symbol).
    pub key: String,
    /// Display name: drug name, disease name or gene symbol.
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub target: NodeIdx,
    pub relation: RelationKind,
    pub weight: f64,
    /// Evidence (treats) or note (targets) carried over from the relation row.
    pub annotation: Option<String>,
    /// Drug through which an `AssociatedWith` edge was propagated.
    pub via: Option<NodeIdx>,
}

/// Directed, typed, weighted multi-relational graph.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeGraph {
    pub(crate) nodes: Vec<Node>,
    pub(crate) outgoing: Vec<Vec<Edge>>,
    pub(crate) incoming: Vec<Vec<NodeIdx>>,
    index: HashMap<String, NodeIdx>,
    edge_count: usize,
}

impl KnowledgeGraph {
    /// Build the graph from an entity store.
    pub fn from_store(store: &EntityStore) -> Result<Self> {
        Self::build(
            store.drugs(),
            store.diseases(),
            store.genes(),
            store.drug_disease(),
            store.drug_gene(),
        )
    }

    /// Construct nodes for every entity and directed edges for every relation,
    /// then propagate gene → disease associations.
    ///
    /// Fails with [`RepurxError::DataIntegrity`] when a relation references a
    /// drug, disease or gene that is not in the supplied collections.
    pub fn build(
        drugs: &[Drug],
        diseases: &[Disease],
        genes: &[Gene],
        drug_disease: &[DrugDiseaseRelation],
        drug_gene: &[DrugGeneRelation],
    ) -> Result<Self> {
        let mut graph = Self::default();

        for drug in drugs {
            graph.add_node(EntityKind::Drug, &drug.drug_id, &drug.name);
        }
        for disease in diseases {
            graph.add_node(EntityKind::Disease, &disease.disease_id, &disease.name);
        }
        for gene in genes {
            graph.add_node(EntityKind::Gene, &gene.gene_symbol, &gene.gene_symbol);
        }

        for rel in drug_disease {
            let drug = graph.require("drug_disease", EntityKind::Drug, &rel.drug_id)?;
            let disease = graph.require("drug_disease", EntityKind::Disease, &rel.disease_id)?;
            graph.add_edge(drug, Edge {
                target: disease,
                relation: RelationKind::Treats,
                weight: RelationKind::Treats.default_weight(),
                annotation: non_empty(&rel.evidence),
                via: None,
            });
        }

        for rel in drug_gene {
            let drug = graph.require("drug_gene", EntityKind::Drug, &rel.drug_id)?;
            let gene = graph.require("drug_gene", EntityKind::Gene, &rel.gene_symbol)?;
            graph.add_edge(drug, Edge {
                target: gene,
                relation: RelationKind::Targets,
                weight: RelationKind::Targets.default_weight(),
                annotation: non_empty(&rel.note),
                via: None,
            });
        }

        graph.propagate_associations(drugs);
        graph.finalise();

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "Knowledge graph built"
        );
        Ok(graph)
    }

    /// For every drug, in ascending id order, link each targeted gene to each
    /// treated disease. The first drug to create a link is kept as `via`.
    fn propagate_associations(&mut self, drugs: &[Drug]) {
        let mut drug_ids: Vec<&str> = drugs.iter().map(|d| d.drug_id.as_str()).collect();
        drug_ids.sort_unstable();
        drug_ids.dedup();

        for drug_id in drug_ids {
            let Some(drug) = self.lookup(EntityKind::Drug, drug_id) else { continue };
            let edges = &self.outgoing[drug.index()];
            let treated: Vec<NodeIdx> = edges
                .iter()
                .filter(|e| e.relation == RelationKind::Treats)
                .map(|e| e.target)
                .collect();
            let targeted: Vec<NodeIdx> = edges
                .iter()
                .filter(|e| e.relation == RelationKind::Targets)
                .map(|e| e.target)
                .collect();

            for &gene in &targeted {
                for &disease in &treated {
                    self.add_edge(gene, Edge {
                        target: disease,
                        relation: RelationKind::AssociatedWith,
                        weight: RelationKind::AssociatedWith.default_weight(),
                        annotation: None,
                        via: Some(drug),
                    });
                }
            }
        }
    }

    /// Sort adjacency by target id so traversal order is deterministic, and
    /// build the reverse adjacency used for distance queries.
    fn finalise(&mut self) {
        let nodes = &self.nodes;
        for edges in self.outgoing.iter_mut() {
            edges.sort_by(|a, b| {
                nodes[a.target.index()]
                    .id
                    .cmp(&nodes[b.target.index()].id)
                    .then(a.relation.cmp(&b.relation))
            });
        }

        self.incoming = vec![Vec::new(); self.nodes.len()];
        for (source, edges) in self.outgoing.iter().enumerate() {
            for edge in edges {
                self.incoming[edge.target.index()].push(NodeIdx(source as u32));
            }
        }
        for preds in self.incoming.iter_mut() {
            preds.sort_unstable();
            preds.dedup();
        }
    }

    fn add_node(&mut self, kind: EntityKind, key: &str, label: &str) -> NodeIdx {
        let id = kind.namespaced(key);
        if let Some(&idx) = self.index.get(&id) {
            return idx;
        }
        let idx = NodeIdx(self.nodes.len() as u32);
        self.nodes.push(Node {
            id: id.clone(),
            kind,
            key: key.to_string(),
            label: label.to_string(),
        });
        self.outgoing.push(Vec::new());
        self.index.insert(id, idx);
        idx
    }

    /// Insert an edge unless one with the same target and relation exists.
    fn add_edge(&mut self, source: NodeIdx, edge: Edge) -> bool {
        let edges = &mut self.outgoing[source.index()];
        if edges.iter().any(|e| e.target == edge.target && e.relation == edge.relation) {
            return false;
        }
        edges.push(edge);
        self.edge_count += 1;
        true
    }

    fn require(&self, relation: &'static str, kind: EntityKind, key: &str) -> Result<NodeIdx> {
        self.lookup(kind, key).ok_or_else(|| RepurxError::DataIntegrity {
            relation,
            kind: kind.as_str(),
            id: key.to_string(),
        })
    }

    // ── Lookups ────────────────────────────────────────────────────────────

    pub fn lookup(&self, kind: EntityKind, key: &str) -> Option<NodeIdx> {
        self.index.get(&kind.namespaced(key)).copied()
    }

    pub fn lookup_namespaced(&self, node_id: &str) -> Option<NodeIdx> {
        self.index.get(node_id).copied()
    }

    pub fn node(&self, idx: NodeIdx) -> &Node {
        &self.nodes[idx.index()]
    }

    pub fn edges(&self, idx: NodeIdx) -> &[Edge] {
        &self.outgoing[idx.index()]
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Outgoing neighbour ids of a namespaced node, optionally restricted to
    /// one entity kind. Unknown nodes have no neighbours.
    pub fn neighbors(&self, node_id: &str, kind: Option<EntityKind>) -> Vec<&str> {
        let Some(idx) = self.lookup_namespaced(node_id) else { return Vec::new() };
        self.edges(idx)
            .iter()
            .map(|e| self.node(e.target))
            .filter(|n| kind.map_or(true, |k| n.kind == k))
            .map(|n| n.id.as_str())
            .collect()
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
