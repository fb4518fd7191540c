//! repurx-ranker: Drug candidate ranking for a disease and per-pair
//! explanations, over an immutable snapshot of graph, index and store.

pub mod weights;
pub mod normalise;
pub mod snapshot;
pub mod ranker;
pub mod explain;

pub use explain::{Explainer, Explanation, KnownEvidence, PathEvidence, TextOverlap};
pub use ranker::{Candidate, RankedList, Ranker};
pub use snapshot::{RepurposeEngine, Snapshot, SnapshotHandle};
pub use weights::FusionWeights;
