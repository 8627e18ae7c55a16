//! # resqroute-push
//!
//! Push notification delivery for ResQroute.
//!
//! ## Modules
//!
//! - `message`: the provider-neutral notification payload and delivery reports
//! - `provider`: the [`PushProvider`] trait
//! - `fcm`: Firebase Cloud Messaging HTTP v1 client with service-account OAuth
//! - `memory`: a recording provider for local runs and tests
//! - `manager`: provider selection and multicast fan-out

pub mod fcm;
pub mod manager;
pub mod memory;
pub mod message;
pub mod provider;

pub use manager::PushManager;
pub use memory::MemoryPushProvider;
pub use message::{MulticastReport, PushMessage};
pub use provider::PushProvider;
