//! Activity log entities.

pub mod action;
pub mod model;

pub use model::{ActivityFilter, ActivityLog, NewActivityLog};
