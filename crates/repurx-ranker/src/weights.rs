//! Fusion weights for the graph and text components.

use repurx_common::{EngineConfig, RepurxError, Result};
use serde::{Deserialize, Serialize};

/// `fused = graph * graph_score + text * text_score`.
/// Weights need not sum to 1; see [`FusionWeights::normalised`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    pub graph: f64,
    pub text: f64,
}

impl Default for FusionWeights {
    fn default() -> Self {
        Self { graph: 0.5, text: 0.5 }
    }
}

impl From<&EngineConfig> for FusionWeights {
    fn from(config: &EngineConfig) -> Self {
        Self { graph: config.graph_weight, text: config.text_weight }
    }
}

impl FusionWeights {
    pub fn new(graph: f64, text: f64) -> Result<Self> {
        let weights = Self { graph, text };
        weights.validate()?;
        Ok(weights)
    }

    /// Both weights must be finite and non-negative.
    pub fn validate(&self) -> Result<()> {
        for (name, w) in [("graph", self.graph), ("text", self.text)] {
            if !w.is_finite() || w < 0.0 {
                return Err(RepurxError::InvalidArgument(format!(
                    "{name} weight must be a finite, non-negative number (got {w})"
                )));
            }
        }
        Ok(())
    }

    pub fn sum(&self) -> f64 {
        self.graph + self.text
    }

    /// Rescaled copy summing to 1.0.
    pub fn normalised(&self) -> Result<Self> {
        self.validate()?;
        let sum = self.sum();
        if sum <= 0.0 {
            return Err(RepurxError::InvalidArgument("weights sum to zero".to_string()));
        }
        Ok(Self { graph: self.graph / sum, text: self.text / sum })
    }

    pub fn fuse(&self, graph_score: f64, text_score: f64) -> f64 {
        self.graph * graph_score + self.text * text_score
    }
}
