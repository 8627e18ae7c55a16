//! Push notifications: alert fan-out and per-user device operations.

pub mod fanout;
pub mod service;

pub use fanout::{Audience, FanoutReport, NotificationFanout, StageOutcome, StageStatus};
pub use service::{NotificationService, TestDelivery};
