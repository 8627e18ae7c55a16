//! Activity log: best-effort writer, queries and retention.

pub mod logger;
pub mod retention;
pub mod service;

pub use logger::ActivityLogger;
pub use retention::RetentionScheduler;
pub use service::{
    ActivityLogView, ActivityPage, ActivityService, CleanupReport, DashboardStats, LogPagination,
};
