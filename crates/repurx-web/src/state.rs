//! Shared application state for the web server.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use repurx_common::EntityStore;
use repurx_ingestion::SeedLoader;
use repurx_ranker::RepurposeEngine;
use tracing::info;

use crate::config::Config;

/// Shared state injected into every Axum handler.
pub struct AppState {
    pub engine: RepurposeEngine,
    pub config: Config,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Load the seed tables from `config.data.dir` and build the first snapshot.
    pub fn load(config: Config) -> anyhow::Result<Self> {
        let store = SeedLoader::new(config.data.dir.clone()).load()?;
        Self::from_store(store, config)
    }

    /// Build the engine over `store` with the configured embedder. Loading a
    /// BERT model blocks; call from a worker thread inside async code.
    pub fn from_store(store: EntityStore, config: Config) -> anyhow::Result<Self> {
        let embedder = config.embedder.build(config.engine.embedding_dim)?;
        info!(embedder = embedder.name(), "Embedder ready");
        let engine = RepurposeEngine::with_embedder(store, embedder, config.engine.clone())?;
        Ok(Self { engine, config, started_at: Utc::now() })
    }

    pub fn loader(&self) -> SeedLoader {
        SeedLoader::new(self.config.data.dir.clone())
    }
}

pub type SharedState = Arc<AppState>;
