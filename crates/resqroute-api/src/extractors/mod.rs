//! Custom Axum extractors.

pub mod auth;
pub mod client;
pub mod json;
pub mod path;

pub use auth::{AuthUser, MaybeAuthUser};
pub use client::ClientMeta;
pub use json::{AppJson, ValidQuery, validate};
pub use path::IdPath;
