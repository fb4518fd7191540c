//! repurx-embed: Text embeddings for drug indications and disease names.
//!
//! The index never talks to a model directly; it is handed a
//! [`TextEmbedder`]. Two implementations ship here:
//!
//! - [`HashingEmbedder`]: deterministic signed feature hashing, no model files
//! - `BertEmbedder` (feature `bert`): Candle BERT sentence embeddings pulled
//!   from the Hugging Face Hub
//!
//! [`EmbedderConfig::build`] picks one from the `[embedder]` config table.
//!
//! # Example
//! ```rust
//! use repurx_embed::{HashingEmbedder, TextEmbedder};
//!
//! let embedder = HashingEmbedder::new(256);
//! let v = embedder.embed("type 2 diabetes, insulin resistance").unwrap();
//! assert_eq!(v.len(), 256);
//! ```

pub mod embedder;
pub mod hashing;
pub mod cache;
pub mod index;
pub mod error;
pub mod config;

#[cfg(feature = "bert")]
pub mod bert;
#[cfg(feature = "bert")]
pub mod pooling;

pub use embedder::TextEmbedder;
pub use hashing::HashingEmbedder;
pub use cache::{CachedEmbedder, EmbeddingCache};
pub use index::EmbeddingIndex;
pub use error::EmbedError;
pub use config::{BertConfig, EmbedderConfig, EmbedderKind, PoolingStrategy};

#[cfg(feature = "bert")]
pub use bert::BertEmbedder;
