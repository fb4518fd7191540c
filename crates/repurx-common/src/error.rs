use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepurxError {
    /// A relation references an entity that was never loaded.
    /// Only raised while building a graph or index.
    #[error("Data integrity error: {relation} relation references unknown {kind} '{id}'")]
    DataIntegrity {
        relation: &'static str,
        kind: &'static str,
        id: String,
    },

    #[error("Unknown entity: {0}")]
    UnknownEntity(String),

    #[error("Unknown disease: {0}")]
    UnknownDisease(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Embedding error: {0}")]
    Embedding(String),
}

impl RepurxError {
    /// True for errors caused by the caller's query rather than the loaded data.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            RepurxError::UnknownEntity(_)
                | RepurxError::UnknownDisease(_)
                | RepurxError::InvalidArgument(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, RepurxError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integrity_message_names_relation() {
        let err = RepurxError::DataIntegrity {
            relation: "drug_gene",
            kind: "drug",
            id: "D404".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Data integrity error: drug_gene relation references unknown drug 'D404'"
        );
        assert!(!err.is_client_error());
    }

    #[test]
    fn test_lookup_failures_are_client_errors() {
        assert!(RepurxError::UnknownDisease("DI999".into()).is_client_error());
        assert!(RepurxError::InvalidArgument("k".into()).is_client_error());
    }
}
