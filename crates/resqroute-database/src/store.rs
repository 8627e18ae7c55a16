//! Store traits the service layer depends on.
//!
//! Each trait has a PostgreSQL implementation in [`crate::repositories`] and
//! an in-memory implementation in [`crate::memory`]. Both must behave the
//! same way for every method documented here.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use resqroute_core::result::AppResult;
use resqroute_core::types::pagination::{PageRequest, PageResponse};
use resqroute_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};
use resqroute_entity::alert::{Alert, AlertFilter, AlertStatus, CreateAlert, UpdateAlert};
use resqroute_entity::user::{CreateUser, UpdateProfile, User, UserRole};

/// Message used for unique-email violations.
pub const EMAIL_TAKEN: &str = "Email already registered";

/// User counts grouped by role.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct RoleCounts {
    pub total: i64,
    pub admins: i64,
    pub drivers: i64,
    pub users: i64,
}

/// Alert counts grouped by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AlertCounts {
    pub total: i64,
    pub active: i64,
    pub resolved: i64,
    pub cancelled: i64,
}

/// Persistence for user accounts.
#[async_trait]
pub trait UserStore: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<User>>;

    /// Find a user by normalized email.
    async fn find_by_email(&self, email: &str) -> AppResult<Option<User>>;

    /// Fetch several users at once; missing IDs are skipped.
    async fn find_by_ids(&self, ids: &[Uuid]) -> AppResult<Vec<User>>;

    /// List users newest first, optionally capped.
    async fn list(&self, limit: Option<usize>) -> AppResult<Vec<User>>;

    /// Insert a user. Fails with `Conflict` when the email is taken.
    async fn create(&self, data: &CreateUser) -> AppResult<User>;

    /// Change name and/or email. `Ok(None)` when the user does not exist,
    /// `Conflict` when the new email is taken.
    async fn update_profile(&self, id: Uuid, data: &UpdateProfile) -> AppResult<Option<User>>;

    /// Change the role. `Ok(None)` when the user does not exist.
    async fn update_role(&self, id: Uuid, role: UserRole) -> AppResult<Option<User>>;

    /// Delete a user. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Stamp the last successful login.
    async fn record_login(&self, id: Uuid, at: DateTime<Utc>) -> AppResult<()>;

    /// Make `token` the current push token and add it to the token set.
    async fn register_push_token(&self, id: Uuid, token: &str) -> AppResult<Option<User>>;

    /// Users that have at least one push token, optionally restricted to a
    /// role and capped, newest first.
    async fn find_push_recipients(
        &self,
        role: Option<UserRole>,
        limit: Option<usize>,
    ) -> AppResult<Vec<User>>;

    /// Counts per role.
    async fn count_by_role(&self) -> AppResult<RoleCounts>;

    /// Number of users who logged in at or after `since`.
    async fn count_logged_in_since(&self, since: DateTime<Utc>) -> AppResult<i64>;
}

/// Persistence for alerts.
#[async_trait]
pub trait AlertStore: Send + Sync + std::fmt::Debug + 'static {
    /// Insert an alert with status `active`.
    async fn create(&self, data: &CreateAlert) -> AppResult<Alert>;

    /// Find an alert by primary key.
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>>;

    /// List alerts newest first.
    async fn list(&self, filter: &AlertFilter) -> AppResult<Vec<Alert>>;

    /// Edit descriptive fields. `Ok(None)` when the alert does not exist.
    async fn update(&self, id: Uuid, data: &UpdateAlert) -> AppResult<Option<Alert>>;

    /// Change status.
    ///
    /// `resolved` stamps `resolved_at` with `at` unless it is already set,
    /// `active` clears it, `cancelled` leaves it untouched.
    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>>;

    /// Delete an alert. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    /// Counts per status.
    async fn count_by_status(&self) -> AppResult<AlertCounts>;
}

/// Persistence for the append-only activity log.
#[async_trait]
pub trait ActivityStore: Send + Sync + std::fmt::Debug + 'static {
    /// Append an entry.
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog>;

    /// Page through entries newest first.
    async fn list(
        &self,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>>;

    /// Number of entries written at or after `since`.
    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64>;

    /// Delete entries written before `cutoff`. Returns the number removed.
    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64>;
}

/// The `resolved_at` value a status change leaves behind.
pub fn next_resolved_at(
    current: Option<DateTime<Utc>>,
    status: AlertStatus,
    at: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    match status {
        AlertStatus::Resolved => current.or(Some(at)),
        AlertStatus::Active => None,
        AlertStatus::Cancelled => current,
    }
}
