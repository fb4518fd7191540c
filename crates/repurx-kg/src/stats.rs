//! Summary statistics over a built graph.

use std::collections::BTreeMap;

use repurx_common::entities::EntityKind;
use serde::{Deserialize, Serialize};

use crate::graph::KnowledgeGraph;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphStats {
    pub total_nodes: usize,
    pub drug_nodes: usize,
    pub disease_nodes: usize,
    pub gene_nodes: usize,
    pub total_edges: usize,
    /// Edge count per relation kind, keyed by `RelationKind::as_str`.
    pub edges_by_relation: BTreeMap<String, usize>,
    /// `E / (N * (N - 1))` for a directed graph; 0 with fewer than two nodes.
    pub density: f64,
}

impl KnowledgeGraph {
    pub fn stats(&self) -> GraphStats {
        let count = |kind: EntityKind| self.nodes.iter().filter(|n| n.kind == kind).count();

        let mut edges_by_relation = BTreeMap::new();
        for edge in self.outgoing.iter().flatten() {
            *edges_by_relation.entry(edge.relation.as_str().to_string()).or_insert(0) += 1;
        }

        let n = self.node_count() as f64;
        let density = if self.node_count() < 2 {
            0.0
        } else {
            self.edge_count() as f64 / (n * (n - 1.0))
        };

        GraphStats {
            total_nodes: self.node_count(),
            drug_nodes: count(EntityKind::Drug),
            disease_nodes: count(EntityKind::Disease),
            gene_nodes: count(EntityKind::Gene),
            total_edges: self.edge_count(),
            edges_by_relation,
            density,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use repurx_test_utils::tiny_store;

    #[test]
    fn test_tiny_stats() {
        let graph = KnowledgeGraph::from_store(&tiny_store()).unwrap();
        let stats = graph.stats();
        assert_eq!(stats.total_nodes, 5);
        assert_eq!(stats.drug_nodes, 2);
        assert_eq!(stats.disease_nodes, 2);
        assert_eq!(stats.gene_nodes, 1);
        assert_eq!(stats.total_edges, 4);
        assert_eq!(
            stats.edges_by_relation,
            BTreeMap::from([
                ("associated_with".to_string(), 1),
                ("targets".to_string(), 2),
                ("treats".to_string(), 1),
            ])
        );
        assert!((stats.density - 4.0 / 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_graph_density() {
        let stats = KnowledgeGraph::default().stats();
        assert_eq!(stats.total_nodes, 0);
        assert_eq!(stats.density, 0.0);
    }
}
