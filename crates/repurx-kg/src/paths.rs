//! Bounded shortest-path enumeration and the proximity score built on it.

use std::collections::{HashMap, VecDeque};

use repurx_common::entities::EntityKind;
use serde::{Deserialize, Serialize};

use crate::graph::{Edge, KnowledgeGraph, NodeIdx, RelationKind};

pub const DEFAULT_MAX_PATH_LENGTH: usize = 3;
pub const DEFAULT_MAX_PATHS: usize = 3;

/// One directed edge along a path, with display labels resolved.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hop {
    pub source: String,
    pub source_label: String,
    pub relation: RelationKind,
    pub target: String,
    pub target_label: String,
    pub weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
    /// Namespaced id of the drug an association was propagated through.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub via_label: Option<String>,
}

/// A simple directed path, stored as its hops.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GraphPath {
    pub hops: Vec<Hop>,
}

impl GraphPath {
    /// Number of edges.
    pub fn len(&self) -> usize {
        self.hops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hops.is_empty()
    }

    /// Namespaced node ids from source to destination.
    pub fn node_ids(&self) -> Vec<&str> {
        let mut ids = Vec::with_capacity(self.hops.len() + 1);
        if let Some(first) = self.hops.first() {
            ids.push(first.source.as_str());
        }
        ids.extend(self.hops.iter().map(|h| h.target.as_str()));
        ids
    }
}

/// Proximity score for a minimum path length: `1 / (1 + len)`, or 0 when no
/// path exists within the bound.
pub fn proximity_score(min_length: Option<usize>) -> f64 {
    match min_length {
        Some(len) => 1.0 / (1.0 + len as f64),
        None => 0.0,
    }
}

impl KnowledgeGraph {
    /// Up to `max_paths` simple directed paths from `source_id` to
    /// `target_id` with at most `max_length` edges, shortest first and
    /// lexicographic by node ids within a length. Paths never continue
    /// through the destination. Unknown endpoints yield no paths.
    pub fn shortest_paths(
        &self,
        source_id: &str,
        target_id: &str,
        max_length: usize,
        max_paths: usize,
    ) -> Vec<GraphPath> {
        let mut out = Vec::new();
        let (Some(source), Some(target)) = (
            self.lookup_namespaced(source_id),
            self.lookup_namespaced(target_id),
        ) else {
            return out;
        };
        if source == target || max_paths == 0 {
            return out;
        }

        let distance = self.distances_to(target, max_length);
        let Some(&shortest) = distance.get(&source) else { return out };

        let mut on_path = vec![false; self.node_count()];
        on_path[source.index()] = true;
        let mut trail: Vec<(NodeIdx, &Edge)> = Vec::with_capacity(max_length);

        for length in shortest..=max_length {
            if out.len() >= max_paths {
                break;
            }
            let mut walk = Walk {
                target,
                limit: max_paths,
                distance: &distance,
                on_path: &mut on_path,
                trail: &mut trail,
                out: &mut out,
            };
            self.walk_exact(&mut walk, source, length);
        }
        out
    }

    /// Depth-first enumeration of paths with exactly `remaining` more edges.
    /// Adjacency is sorted by target id, so emission order is lexicographic.
    fn walk_exact<'g>(&'g self, walk: &mut Walk<'_, 'g>, current: NodeIdx, remaining: usize) {
        for edge in self.edges(current) {
            if walk.out.len() >= walk.limit {
                return;
            }
            let next = edge.target;
            if walk.on_path[next.index()] {
                continue;
            }
            if next == walk.target {
                if remaining == 1 {
                    walk.trail.push((current, edge));
                    let path = self.materialise(&walk.trail[..]);
                    walk.out.push(path);
                    walk.trail.pop();
                }
                continue;
            }
            // prune nodes that cannot reach the destination in time
            match walk.distance.get(&next) {
                Some(&d) if remaining > 1 && d <= remaining - 1 => {}
                _ => continue,
            }
            walk.on_path[next.index()] = true;
            walk.trail.push((current, edge));
            self.walk_exact(walk, next, remaining - 1);
            walk.trail.pop();
            walk.on_path[next.index()] = false;
        }
    }

    fn materialise(&self, trail: &[(NodeIdx, &Edge)]) -> GraphPath {
        let hops = trail
            .iter()
            .map(|&(from, edge)| {
                let source = self.node(from);
                let target = self.node(edge.target);
                let via = edge.via.map(|v| self.node(v));
                Hop {
                    source: source.id.clone(),
                    source_label: source.label.clone(),
                    relation: edge.relation,
                    target: target.id.clone(),
                    target_label: target.label.clone(),
                    weight: edge.weight,
                    annotation: edge.annotation.clone(),
                    via: via.map(|n| n.id.clone()),
                    via_label: via.map(|n| n.label.clone()),
                }
            })
            .collect();
        GraphPath { hops }
    }

    /// Minimum number of edges from `source_id` to `target_id`, if a path of
    /// at most `max_length` edges exists.
    pub fn min_path_length(&self, source_id: &str, target_id: &str, max_length: usize) -> Option<usize> {
        let source = self.lookup_namespaced(source_id)?;
        let target = self.lookup_namespaced(target_id)?;
        if source == target {
            return None;
        }
        self.distances_to(target, max_length).get(&source).copied()
    }

    /// `1 / (1 + shortest path length)` for a drug/disease pair, 0 when no
    /// path of at most `max_length` edges exists or either id is unknown.
    pub fn direct_score(&self, drug_id: &str, disease_id: &str, max_length: usize) -> f64 {
        proximity_score(self.min_path_length(
            &EntityKind::Drug.namespaced(drug_id),
            &EntityKind::Disease.namespaced(disease_id),
            max_length,
        ))
    }

    /// Direct scores of every drug that reaches `disease_id` within
    /// `max_length` edges, keyed by raw drug id. Drugs that are absent score 0.
    /// One reverse traversal instead of one query per drug.
    pub fn direct_scores_to_disease(&self, disease_id: &str, max_length: usize) -> HashMap<String, f64> {
        let Some(target) = self.lookup(EntityKind::Disease, disease_id) else {
            return HashMap::new();
        };
        self.distances_to(target, max_length)
            .into_iter()
            .filter(|&(idx, d)| d > 0 && self.node(idx).kind == EntityKind::Drug)
            .map(|(idx, d)| (self.node(idx).key.clone(), proximity_score(Some(d))))
            .collect()
    }

    /// Reverse breadth-first distances to `target`, bounded by `max_length`.
    /// The target itself is at distance 0.
    fn distances_to(&self, target: NodeIdx, max_length: usize) -> HashMap<NodeIdx, usize> {
        let mut distance = HashMap::new();
        distance.insert(target, 0);
        let mut queue = VecDeque::from([target]);

        while let Some(node) = queue.pop_front() {
            let d = distance[&node];
            if d >= max_length {
                continue;
            }
            for &pred in &self.incoming[node.index()] {
                if !distance.contains_key(&pred) {
                    distance.insert(pred, d + 1);
                    queue.push_back(pred);
                }
            }
        }
        distance
    }
}

struct Walk<'a, 'g> {
    target: NodeIdx,
    limit: usize,
    distance: &'a HashMap<NodeIdx, usize>,
    on_path: &'a mut Vec<bool>,
    trail: &'a mut Vec<(NodeIdx, &'g Edge)>,
    out: &'a mut Vec<GraphPath>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use repurx_test_utils::{disease, drug, seed_store, targets, tiny_store, treats};

    fn seed_graph() -> KnowledgeGraph {
        KnowledgeGraph::from_store(&seed_store()).unwrap()
    }

    #[test]
    fn test_direct_edge_is_length_one() {
        let graph = seed_graph();
        let paths = graph.shortest_paths("drug:D003", "dis:DI001", 3, 3);
        // the direct indication comes first, then the route through its own target
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].node_ids(), vec!["drug:D003", "dis:DI001"]);
        assert_eq!(paths[0].hops[0].relation, RelationKind::Treats);
        assert_eq!(paths[1].node_ids(), vec!["drug:D003", "gene:DDC", "dis:DI001"]);
        assert_eq!(paths[1].hops[1].via.as_deref(), Some("drug:D003"));

        let first_only = graph.shortest_paths("drug:D003", "dis:DI001", 3, 1);
        assert_eq!(first_only.len(), 1);
        assert_eq!(first_only[0].len(), 1);
        assert_eq!(graph.direct_score("D003", "DI001", 3), 0.5);
    }

    #[test]
    fn test_two_hop_path_through_propagated_gene() {
        let graph = seed_graph();
        let paths = graph.shortest_paths("drug:D001", "dis:DI001", 3, 3);
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].node_ids(), vec!["drug:D001", "gene:AMPK", "dis:DI001"]);
        let last = &paths[0].hops[1];
        assert_eq!(last.relation, RelationKind::AssociatedWith);
        assert_eq!(last.via.as_deref(), Some("drug:D007"));
        assert_eq!(last.via_label.as_deref(), Some("resveratrol"));
        assert!((graph.direct_score("D001", "DI001", 3) - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_length_bound_excludes_longer_paths() {
        let graph = seed_graph();
        assert!(graph.shortest_paths("drug:D001", "dis:DI001", 1, 3).is_empty());
        assert_eq!(graph.direct_score("D001", "DI001", 1), 0.0);
    }

    #[test]
    fn test_unreachable_and_unknown() {
        let graph = seed_graph();
        assert!(graph.shortest_paths("drug:D001", "dis:DI007", 3, 3).is_empty());
        assert_eq!(graph.direct_score("D001", "DI007", 3), 0.0);
        assert!(graph.shortest_paths("drug:NOPE", "dis:DI001", 3, 3).is_empty());
        assert_eq!(graph.direct_score("NOPE", "DI001", 3), 0.0);
        assert_eq!(graph.direct_score("D001", "NOPE", 3), 0.0);
    }

    #[test]
    fn test_paths_sorted_and_capped() {
        // A reaches X directly and through three genes.
        let drugs = vec![drug("A", "a", None, ""), drug("B", "b", None, "")];
        let diseases = vec![disease("X", "x", &[])];
        let genes: Vec<_> = ["G3", "G1", "G2"].iter().map(|g| repurx_common::Gene::new(*g)).collect();
        let dd = vec![treats("A", "X", "approved"), treats("B", "X", "approved")];
        let dg = vec![
            targets("A", "G3", ""), targets("A", "G1", ""), targets("A", "G2", ""),
            targets("B", "G1", ""), targets("B", "G2", ""), targets("B", "G3", ""),
        ];
        let graph = KnowledgeGraph::build(&drugs, &diseases, &genes, &dd, &dg).unwrap();

        let paths = graph.shortest_paths("drug:A", "dis:X", 3, 3);
        let ids: Vec<Vec<&str>> = paths.iter().map(|p| p.node_ids()).collect();
        assert_eq!(ids, vec![
            vec!["drug:A", "dis:X"],
            vec!["drug:A", "gene:G1", "dis:X"],
            vec!["drug:A", "gene:G2", "dis:X"],
        ]);

        let all = graph.shortest_paths("drug:A", "dis:X", 3, 10);
        assert_eq!(all.len(), 4);
        assert!(all.windows(2).all(|w| w[0].len() <= w[1].len()));
    }

    #[test]
    fn test_zero_max_paths() {
        let graph = seed_graph();
        assert!(graph.shortest_paths("drug:D003", "dis:DI001", 3, 0).is_empty());
    }

    #[test]
    fn test_scores_to_disease_match_pairwise() {
        let graph = seed_graph();
        let scores = graph.direct_scores_to_disease("DI001", 3);
        for d in seed_store().drugs() {
            let expected = graph.direct_score(&d.drug_id, "DI001", 3);
            let got = scores.get(&d.drug_id).copied().unwrap_or(0.0);
            assert_eq!(got, expected, "drug {}", d.drug_id);
        }
    }

    #[test]
    fn test_tiny_graph_scores() {
        let graph = KnowledgeGraph::from_store(&tiny_store()).unwrap();
        assert_eq!(graph.direct_score("B", "X", 3), 0.5);
        assert!((graph.direct_score("A", "X", 3) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(graph.direct_score("A", "Y", 3), 0.0);
    }

    #[test]
    fn test_proximity_score() {
        assert_eq!(proximity_score(None), 0.0);
        assert_eq!(proximity_score(Some(1)), 0.5);
        assert_eq!(proximity_score(Some(3)), 0.25);
    }
}
