//! HTTP error type. Every failure leaves as `{"error": "..."}` with a status
//! derived from the underlying error.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use repurx_common::RepurxError;
use repurx_ingestion::IngestError;
use serde_json::json;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Engine(#[from] RepurxError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Engine(RepurxError::UnknownEntity(_) | RepurxError::UnknownDisease(_)) => {
                StatusCode::NOT_FOUND
            }
            ApiError::Engine(RepurxError::InvalidArgument(_)) | ApiError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Engine(_) | ApiError::Ingest(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        } else {
            debug!(status = status.as_u16(), "{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::from(RepurxError::UnknownDisease("DI999".into())).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(RepurxError::UnknownEntity("drug:X".into())).status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::from(RepurxError::InvalidArgument("k".into())).status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::BadRequest("missing".into()).status(), StatusCode::BAD_REQUEST);
        let integrity = RepurxError::DataIntegrity { relation: "drug_gene", kind: "drug", id: "D404".into() };
        assert_eq!(ApiError::from(integrity).status(), StatusCode::INTERNAL_SERVER_ERROR);
        let missing = IngestError::MissingFile("data/drugs.csv".into());
        assert_eq!(ApiError::from(missing).status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_message_passes_through() {
        let err = ApiError::from(RepurxError::UnknownDisease("DI999".into()));
        assert_eq!(err.to_string(), "Unknown disease: DI999");
    }
}
