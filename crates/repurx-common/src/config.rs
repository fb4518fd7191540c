//! Engine configuration: graph traversal bounds, fusion weights and
//! embedding parameters.
//!
//! Loaded as the `[engine]` table of `repurx.toml` (see `repurx-web`), or
//! standalone from TOML/YAML via [`read_config_file`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Maximum hops for path enumeration and the graph score.
    #[serde(default = "default_max_path_length")]
    pub max_path_length: usize,

    /// Maximum paths returned per explanation.
    #[serde(default = "default_max_paths")]
    pub max_paths: usize,

    /// Default weight of the graph score in the fused score.
    #[serde(default = "default_weight")]
    pub graph_weight: f64,

    /// Default weight of the text score in the fused score.
    #[serde(default = "default_weight")]
    pub text_weight: f64,

    /// Dimension of the built-in hashing embedder.
    #[serde(default = "default_embedding_dim")]
    pub embedding_dim: usize,

    /// Number of text vectors kept in the content-hash cache (0 disables it).
    #[serde(default = "default_cache_size")]
    pub embedding_cache_size: usize,
}

fn default_max_path_length() -> usize { 3 }
fn default_max_paths()       -> usize { 3 }
fn default_weight()          -> f64   { 0.5 }
fn default_embedding_dim()   -> usize { 256 }
fn default_cache_size()      -> usize { 10_000 }

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_path_length:      default_max_path_length(),
            max_paths:            default_max_paths(),
            graph_weight:         default_weight(),
            text_weight:          default_weight(),
            embedding_dim:        default_embedding_dim(),
            embedding_cache_size: default_cache_size(),
        }
    }
}

impl EngineConfig {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_path_length == 0 {
            anyhow::bail!("engine.max_path_length must be at least 1");
        }
        if self.max_paths == 0 {
            anyhow::bail!("engine.max_paths must be at least 1");
        }
        if self.embedding_dim == 0 {
            anyhow::bail!("engine.embedding_dim must be at least 1");
        }
        for (name, w) in [("graph_weight", self.graph_weight), ("text_weight", self.text_weight)] {
            if !w.is_finite() || w < 0.0 {
                anyhow::bail!("engine.{name} must be a finite, non-negative number (got {w})");
            }
        }
        Ok(())
    }
}

/// Read a config file, choosing the parser by extension:
/// `.yaml`/`.yml` → YAML, `.json` → JSON, anything else → TOML.
pub fn read_config_file<T: DeserializeOwned>(path: impl AsRef<Path>) -> anyhow::Result<T> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    let parsed = match path.extension().and_then(|e| e.to_str()) {
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
        Some("json") => serde_json::from_str(&content)?,
        _ => toml::from_str(&content)?,
    };
    Ok(parsed)
}
