//! Embedder selection and BERT settings.
//!
//! Read as the `[embedder]` table of `repurx.toml`. These types carry no
//! model code, so they parse the same with or without the `bert` feature.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::embedder::TextEmbedder;
use crate::error::EmbedError;
use crate::hashing::HashingEmbedder;

/// Which text embedder backs the similarity index.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderKind {
    /// Signed feature hashing, no model files
    #[default]
    Hashing,
    /// Candle BERT sentence embeddings; needs the `bert` feature
    Bert,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct EmbedderConfig {
    #[serde(default)]
    pub kind: EmbedderKind,

    #[serde(default)]
    pub bert: BertConfig,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PoolingStrategy {
    /// Average of non-padding token states
    #[default]
    Mean,
    /// State of the leading `[CLS]` token
    Cls,
    /// Element-wise max over non-padding token states
    Max,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BertConfig {
    /// Hugging Face model id
    #[serde(default = "default_model_id")]
    pub model_id: String,

    #[serde(default = "default_max_length")]
    pub max_length: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_true")]
    pub normalize: bool,

    #[serde(default)]
    pub pooling: PoolingStrategy,

    #[serde(default)]
    pub use_gpu: bool,
}

fn default_model_id()   -> String { "sentence-transformers/all-MiniLM-L6-v2".to_string() }
fn default_max_length() -> usize  { 256 }
fn default_batch_size() -> usize  { 32 }
fn default_true()       -> bool   { true }

impl Default for BertConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            max_length: default_max_length(),
            batch_size: default_batch_size(),
            normalize: true,
            pooling: PoolingStrategy::Mean,
            use_gpu: false,
        }
    }
}

impl EmbedderConfig {
    /// Build the configured embedder. `hashing_dimension` sizes the hashing
    /// embedder; a BERT model reports its own hidden size.
    ///
    /// Loading BERT blocks on the hub download; call from a worker thread
    /// inside async code.
    pub fn build(&self, hashing_dimension: usize) -> Result<Arc<dyn TextEmbedder>, EmbedError> {
        match self.kind {
            EmbedderKind::Hashing => Ok(Arc::new(HashingEmbedder::new(hashing_dimension))),
            EmbedderKind::Bert => self.build_bert(),
        }
    }

    #[cfg(feature = "bert")]
    fn build_bert(&self) -> Result<Arc<dyn TextEmbedder>, EmbedError> {
        Ok(Arc::new(crate::bert::BertEmbedder::load(self.bert.clone())?))
    }

    #[cfg(not(feature = "bert"))]
    fn build_bert(&self) -> Result<Arc<dyn TextEmbedder>, EmbedError> {
        Err(EmbedError::ModelLoad(format!(
            "embedder kind 'bert' ({}) requires building with the `bert` feature",
            self.bert.model_id
        )))
    }
}
