//! Server configuration.
//! Reads repurx.toml from the current directory or the path in REPURX_CONFIG.
//! Paths ending in `.yaml`/`.yml` are parsed as YAML.

use repurx_common::config::read_config_file;
use repurx_common::EngineConfig;
use repurx_embed::EmbedderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub embedder: EmbedderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Candidates returned by `/rank` when `k` is omitted.
    #[serde(default = "default_k")]
    pub default_k: usize,
    #[serde(default = "default_max_k")]
    pub max_k: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Directory holding seed_drugs.csv, seed_diseases.csv, seed_drug_disease.csv
    /// and seed_drug_gene.csv.
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
}

fn default_bind()     -> String  { "127.0.0.1:8000".to_string() }
fn default_k()        -> usize   { 10 }
fn default_max_k()    -> usize   { 50 }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self { bind: default_bind(), default_k: default_k(), max_k: default_max_k() }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self { dir: default_data_dir() }
    }
}

#[cfg(test)]
mod tests;

impl Config {
    /// Load configuration from repurx.toml.
    /// Checks REPURX_CONFIG env var first, then current directory.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("REPURX_CONFIG")
            .unwrap_or_else(|_| "repurx.toml".to_string());

        if !Path::new(&path).exists() {
            anyhow::bail!(
                "Config file not found: {}\n\
                 Copy repurx.example.toml to repurx.toml and edit it.",
                path
            );
        }

        Self::from_file(&path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.engine.validate()?;
        if self.server.max_k == 0 {
            anyhow::bail!("server.max_k must be at least 1");
        }
        if self.server.default_k == 0 || self.server.default_k > self.server.max_k {
            anyhow::bail!(
                "server.default_k must be between 1 and server.max_k ({}), got {}",
                self.server.max_k,
                self.server.default_k
            );
        }
        Ok(())
    }
}
