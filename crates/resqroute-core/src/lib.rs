//! # resqroute-core
//!
//! Core crate for ResQroute. Contains the configuration schema and loader,
//! pagination types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other ResQroute crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
