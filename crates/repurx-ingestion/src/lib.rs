//! repurx-ingestion: Loads the drug, disease and relation CSV files into a
//! validated [`repurx_common::EntityStore`].

pub mod error;
pub mod loader;

pub use error::{IngestError, Result};
pub use loader::SeedLoader;
