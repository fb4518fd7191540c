use std::path::PathBuf;

use repurx_common::RepurxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Missing input file: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("{file} line {line}: missing required field '{field}'")]
    MissingField {
        file: String,
        line: u64,
        field: &'static str,
    },

    #[error("{file}: duplicate id '{id}'")]
    DuplicateId { file: String, id: String },

    #[error(transparent)]
    Integrity(#[from] RepurxError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
