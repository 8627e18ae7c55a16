//! User administration.

pub mod service;

pub use service::{ProfileInput, UserService, UserStats};
