//! Immutable query snapshots and the engine that serves and swaps them.

use std::sync::{Arc, RwLock};
use std::time::Instant;

use chrono::{DateTime, Utc};
use repurx_common::{EngineConfig, EntityStore, RepurxError, Result};
use repurx_embed::{CachedEmbedder, EmbeddingCache, EmbeddingIndex, HashingEmbedder, TextEmbedder};
use repurx_kg::KnowledgeGraph;
use tracing::{info, warn};

use crate::explain::{Explainer, Explanation};
use crate::ranker::{RankedList, Ranker};
use crate::weights::FusionWeights;

/// Everything a query reads: the entity store plus the graph and the
/// embedding index derived from it. Never mutated once built.
#[derive(Debug)]
pub struct Snapshot {
    store: EntityStore,
    graph: KnowledgeGraph,
    index: EmbeddingIndex,
    config: EngineConfig,
    generation: u64,
    built_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn build(store: EntityStore, embedder: &dyn TextEmbedder, config: &EngineConfig) -> Result<Self> {
        let start = Instant::now();
        let graph = KnowledgeGraph::from_store(&store)?;
        let index = EmbeddingIndex::build(store.drugs(), store.diseases(), embedder)?;

        info!(
            drugs = store.drugs().len(),
            diseases = store.diseases().len(),
            genes = store.genes().len(),
            edges = graph.edge_count(),
            embedder = embedder.name(),
            "Snapshot built in {:.2}ms",
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self {
            store,
            graph,
            index,
            config: config.clone(),
            generation: 1,
            built_at: Utc::now(),
        })
    }

    pub fn store(&self) -> &EntityStore {
        &self.store
    }

    pub fn graph(&self) -> &KnowledgeGraph {
        &self.graph
    }

    pub fn index(&self) -> &EmbeddingIndex {
        &self.index
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// 1 for the first snapshot served, incremented on every swap.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn built_at(&self) -> DateTime<Utc> {
        self.built_at
    }

    pub fn ranker(&self) -> Ranker<'_> {
        Ranker::new(self)
    }

    pub fn explainer(&self) -> Explainer<'_> {
        Explainer::new(self)
    }
}

/// The currently served snapshot. Readers clone the `Arc` and keep a
/// consistent view for as long as they hold it.
#[derive(Debug)]
pub struct SnapshotHandle {
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotHandle {
    pub fn new(snapshot: Snapshot) -> Self {
        Self { current: RwLock::new(Arc::new(snapshot)) }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        self.current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Install `next` as the served snapshot and return its generation.
    pub fn swap(&self, mut next: Snapshot) -> u64 {
        let mut guard = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        next.generation = guard.generation + 1;
        let generation = next.generation;
        *guard = Arc::new(next);
        generation
    }
}

/// Query front end: owns the snapshot handle, the cached embedder shared
/// across reloads and the engine configuration.
pub struct RepurposeEngine {
    handle: SnapshotHandle,
    embedder: CachedEmbedder<Arc<dyn TextEmbedder>>,
    config: EngineConfig,
}

impl RepurposeEngine {
    /// Engine backed by the built-in hashing embedder.
    pub fn new(store: EntityStore, config: EngineConfig) -> Result<Self> {
        let embedder: Arc<dyn TextEmbedder> = Arc::new(HashingEmbedder::new(config.embedding_dim));
        Self::with_embedder(store, embedder, config)
    }

    pub fn with_embedder(
        store: EntityStore,
        embedder: Arc<dyn TextEmbedder>,
        config: EngineConfig,
    ) -> Result<Self> {
        config
            .validate()
            .map_err(|e| RepurxError::InvalidArgument(e.to_string()))?;
        let embedder = CachedEmbedder::new(embedder, config.embedding_cache_size);
        let snapshot = Snapshot::build(store, &embedder, &config)?;
        Ok(Self {
            handle: SnapshotHandle::new(snapshot),
            embedder,
            config,
        })
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.handle.current()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        self.embedder.cache()
    }

    /// Rank with the configured weights unless `weights` overrides them.
    pub fn rank(&self, disease_id: &str, k: usize, weights: Option<FusionWeights>) -> Result<RankedList> {
        let weights = weights.unwrap_or_else(|| FusionWeights::from(&self.config));
        self.snapshot().ranker().rank(disease_id, k, weights)
    }

    pub fn explain(&self, drug_id: &str, disease_id: &str) -> Result<Explanation> {
        self.snapshot().explainer().explain(drug_id, disease_id)
    }

    /// Build a snapshot from `store` and swap it in. On failure the served
    /// snapshot is left untouched.
    pub fn reload(&self, store: EntityStore) -> Result<u64> {
        let next = match Snapshot::build(store, &self.embedder, &self.config) {
            Ok(next) => next,
            Err(e) => {
                warn!("Reload failed, keeping generation {}: {}", self.snapshot().generation(), e);
                return Err(e);
            }
        };
        let generation = self.handle.swap(next);
        info!(
            generation,
            cache_entries = self.cache().len(),
            cache_hits = self.cache().hits(),
            "Snapshot swapped"
        );
        Ok(generation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repurx_test_utils::{seed_store, tiny_store, treats};

    #[test]
    fn test_generation_increments_on_swap() {
        let config = EngineConfig::default();
        let embedder = HashingEmbedder::new(32);
        let handle = SnapshotHandle::new(Snapshot::build(tiny_store(), &embedder, &config).unwrap());
        assert_eq!(handle.current().generation(), 1);

        let held = handle.current();
        let generation = handle.swap(Snapshot::build(seed_store(), &embedder, &config).unwrap());
        assert_eq!(generation, 2);
        // an Arc taken before the swap still sees the old data
        assert_eq!(held.store().drugs().len(), 2);
        assert_eq!(handle.current().store().drugs().len(), 10);
    }

    #[test]
    fn test_failed_reload_keeps_snapshot() {
        let engine = RepurposeEngine::new(tiny_store(), EngineConfig::default()).unwrap();
        let store = tiny_store();
        let mut relations = store.drug_disease().to_vec();
        relations.push(treats("GHOST", "X", "approved"));
        let broken = EntityStore::new(
            store.drugs().to_vec(),
            store.diseases().to_vec(),
            relations,
            store.drug_gene().to_vec(),
        )
        .unwrap();

        let err = engine.reload(broken).unwrap_err();
        assert!(matches!(err, RepurxError::DataIntegrity { .. }));
        assert_eq!(engine.snapshot().generation(), 1);
        assert!(engine.rank("X", 2, None).is_ok());
    }

    #[test]
    fn test_reload_reuses_cached_vectors() {
        let engine = RepurposeEngine::new(seed_store(), EngineConfig::default()).unwrap();
        let before = engine.cache().hits();
        assert_eq!(engine.reload(seed_store()).unwrap(), 2);
        // 10 drug texts + 7 disease texts served from cache
        assert_eq!(engine.cache().hits() - before, 17);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig { max_paths: 0, ..Default::default() };
        assert!(matches!(
            RepurposeEngine::new(tiny_store(), config),
            Err(RepurxError::InvalidArgument(_))
        ));
    }
}
