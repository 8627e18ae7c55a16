//! # resqroute-entity
//!
//! Domain entity models for ResQroute. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! derive `sqlx::FromRow` and serialize with camelCase keys, which is the
//! shape the mobile and dashboard clients consume.

pub mod activity;
pub mod alert;
pub mod user;
