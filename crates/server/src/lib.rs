//! HTTP API server for the Atlas country data service.
//!
//! This crate provides the outward surface:
//! - The refresh pipeline (fetch, reconcile, transactional upsert)
//! - Country read/delete endpoints and the status check
//! - Summary image generation and serving

pub mod error;
pub mod handlers;
pub mod refresh;
pub mod routes;
pub mod state;
pub mod summary;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
