//! # resqroute-service
//!
//! Business logic for ResQroute. Each service is built from the store traits
//! in `resqroute-database` plus whatever credentials or push machinery it
//! needs, all injected at construction time.

pub mod activity;
pub mod alert;
pub mod auth;
pub mod context;
pub mod notification;
pub mod user;

pub use activity::{ActivityLogger, ActivityService, RetentionScheduler};
pub use alert::AlertService;
pub use auth::AuthService;
pub use context::{ClientInfo, RequestContext};
pub use notification::{NotificationFanout, NotificationService};
pub use user::UserService;
