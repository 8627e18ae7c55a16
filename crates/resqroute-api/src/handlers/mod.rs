//! Route handlers organized by domain.

pub mod alert;
pub mod auth;
pub mod fcm;
pub mod health;
pub mod report;
pub mod user;
