//! repurx-common: Shared entity types, errors, text handling and engine
//! configuration used across all repurx crates.

pub mod error;
pub mod entities;
pub mod store;
pub mod text;
pub mod config;

// Re-export commonly used types
pub use config::EngineConfig;
pub use entities::{Disease, Drug, DrugDiseaseRelation, DrugGeneRelation, EntityKind, Gene};
pub use error::{RepurxError, Result};
pub use store::EntityStore;
