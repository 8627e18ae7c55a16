//! In-memory store implementations backed by `DashMap`.
//!
//! Used by `database.provider = "memory"` and by the test suites. They follow
//! the same contracts as the PostgreSQL repositories, except that deleting a
//! user does not clear `created_by` on that user's alerts.

pub mod activity;
pub mod alert;
pub mod user;

pub use activity::MemoryActivityStore;
pub use alert::MemoryAlertStore;
pub use user::MemoryUserStore;

/// Sort newest first, breaking timestamp ties by the time-ordered ID.
pub(crate) fn newest_first<T>(
    items: &mut [T],
    key: impl Fn(&T) -> (chrono::DateTime<chrono::Utc>, uuid::Uuid),
) {
    items.sort_by(|a, b| key(b).cmp(&key(a)));
}
