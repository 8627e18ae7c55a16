//! Core type definitions used across the ResQroute workspace.

pub mod pagination;

pub use pagination::{PageRequest, PageResponse};
