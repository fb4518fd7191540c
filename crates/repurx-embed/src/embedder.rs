//! The embedding capability injected into index construction.

use repurx_common::Result;

/// Maps text to a fixed-length vector.
///
/// Implementations must be deterministic for a given input so that rebuilt
/// snapshots produce identical scores.
pub trait TextEmbedder: Send + Sync {
    /// Length of every vector this embedder returns.
    fn dimension(&self) -> usize;

    fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Embed several texts, preserving order.
    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        texts.iter().map(|t| self.embed(t)).collect()
    }

    /// Short identifier used in logs.
    fn name(&self) -> &str {
        "embedder"
    }
}

impl<E: TextEmbedder + ?Sized> TextEmbedder for std::sync::Arc<E> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        (**self).embed(text)
    }

    fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        (**self).embed_batch(texts)
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
