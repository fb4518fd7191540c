//! repurx-kg: Drug/gene/disease knowledge graph construction and path queries.
//!
//! The graph is an arena: nodes live in a `Vec` addressed by [`NodeIdx`], with
//! a side map from namespaced id (`drug:D001`, `gene:AMPK`, `dis:DI001`) to
//! index. It is built once from an entity store and never mutated afterwards.

pub mod graph;
pub mod paths;
pub mod stats;

pub use graph::{Edge, KnowledgeGraph, Node, NodeIdx, RelationKind};
pub use paths::{GraphPath, Hop, DEFAULT_MAX_PATH_LENGTH, DEFAULT_MAX_PATHS};
pub use stats::GraphStats;
