//! repurx-web: HTTP front end for the repurx engine.
//! Serves:
//!   - Drug candidate ranking for a disease
//!   - Per-pair explanations
//!   - Drug and disease lookup and search
//!   - Health, graph statistics and live data reload

pub mod config;
pub mod error;
pub mod router;
pub mod handlers;
pub mod state;
