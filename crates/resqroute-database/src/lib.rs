//! # resqroute-database
//!
//! Persistence for ResQroute: the store traits the services depend on,
//! PostgreSQL repositories implementing them, in-memory implementations for
//! local runs and tests, and connection/migration management.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;
pub mod stores;

pub use connection::DatabasePool;
pub use store::{ActivityStore, AlertCounts, AlertStore, RoleCounts, UserStore};
pub use stores::Stores;
