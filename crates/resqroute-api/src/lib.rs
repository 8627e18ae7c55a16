//! # resqroute-api
//!
//! HTTP API layer for ResQroute built on Axum.
//!
//! Provides the REST endpoints, middleware (request logging, CORS,
//! compression, body limits), extractors, DTOs, and the mapping from
//! [`resqroute_core::AppError`] to HTTP responses.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::{ApiError, ApiResult};
pub use state::AppState;
