//! HTTP handlers, one module per resource.

pub mod rank;
pub mod explain;
pub mod entities;
pub mod system;

use repurx_common::{Disease, EntityStore, RepurxError};

use crate::error::ApiError;

/// A required query parameter, trimmed. Missing or blank is a 400.
pub(crate) fn required_param<'a>(value: &'a Option<String>, name: &str) -> Result<&'a str, ApiError> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::BadRequest(format!("missing required query parameter '{name}'")))
}

/// Resolve a disease id, name or free-text query against the store.
pub(crate) fn resolve_disease<'a>(store: &'a EntityStore, query: &str) -> Result<&'a Disease, ApiError> {
    store
        .match_disease(query)
        .ok_or_else(|| RepurxError::UnknownDisease(query.to_string()).into())
}
