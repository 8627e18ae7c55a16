//! Activity log queries, dashboard statistics and retention.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use resqroute_core::error::AppError;
use resqroute_core::types::pagination::PageRequest;
use resqroute_database::{ActivityStore, AlertStore, UserStore};
use resqroute_entity::activity::{ActivityFilter, ActivityLog};
use resqroute_entity::user::UserRef;

use crate::activity::logger::ActivityLogger;
use crate::context::RequestContext;

/// Entries returned by the per-user view.
pub const USER_ACTIVITY_LIMIT: u64 = 50;
/// Entries included in the dashboard.
pub const DASHBOARD_RECENT_LIMIT: u64 = 10;

/// A log entry with its acting user embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLogView {
    #[serde(flatten)]
    pub log: ActivityLog,
    /// The acting user, if they still exist.
    pub user: Option<UserRef>,
}

/// Paging metadata in the shape the dashboard client reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogPagination {
    /// Current page.
    pub current: u64,
    /// Total pages.
    pub total: u64,
    /// Entries on this page.
    pub count: u64,
    /// Entries across all pages.
    pub total_logs: u64,
}

/// One page of the activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPage {
    pub logs: Vec<ActivityLogView>,
    pub pagination: LogPagination,
}

/// User counts on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UserActivityStats {
    pub total: i64,
    /// Users who logged in during the last 24 hours.
    pub active: i64,
}

/// Alert counts on the dashboard.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AlertActivityStats {
    pub total: i64,
    pub active: i64,
    pub resolved: i64,
}

/// Activity counts on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityStats {
    /// Entries written since midnight UTC.
    pub today: i64,
    pub recent: Vec<ActivityLogView>,
}

/// Aggregate figures for the admin dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardStats {
    pub users: UserActivityStats,
    pub alerts: AlertActivityStats,
    pub activities: ActivityStats,
}

/// Result of a retention prune.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupReport {
    pub days: i64,
    pub deleted_count: u64,
}

/// Reads and maintains the activity log.
#[derive(Debug, Clone)]
pub struct ActivityService {
    activity: Arc<dyn ActivityStore>,
    users: Arc<dyn UserStore>,
    alerts: Arc<dyn AlertStore>,
    logger: ActivityLogger,
}

impl ActivityService {
    /// Creates a new activity service.
    pub fn new(
        activity: Arc<dyn ActivityStore>,
        users: Arc<dyn UserStore>,
        alerts: Arc<dyn AlertStore>,
        logger: ActivityLogger,
    ) -> Self {
        Self {
            activity,
            users,
            alerts,
            logger,
        }
    }

    /// Page through the log, newest first, with acting users embedded.
    pub async fn list(
        &self,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> Result<ActivityPage, AppError> {
        let result = self.activity.list(filter, page).await?;
        let pagination = LogPagination {
            current: result.page,
            total: result.total_pages,
            count: result.items.len() as u64,
            total_logs: result.total_items,
        };
        let logs = self.with_users(result.items).await?;
        Ok(ActivityPage { logs, pagination })
    }

    /// The latest entries for one user. Callers may only see their own
    /// history unless they are admins.
    pub async fn list_for_user(
        &self,
        ctx: &RequestContext,
        user_id: Uuid,
    ) -> Result<Vec<ActivityLog>, AppError> {
        if !ctx.is_self_or_admin(user_id) {
            return Err(AppError::authorization("Access denied"));
        }
        let filter = ActivityFilter {
            user_id: Some(user_id),
            action: None,
        };
        let page = self
            .activity
            .list(&filter, PageRequest::new(1, USER_ACTIVITY_LIMIT))
            .await?;
        Ok(page.items)
    }

    /// Record a client-supplied entry for the caller.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        action: &str,
        description: &str,
        metadata: Option<serde_json::Value>,
    ) -> Result<ActivityLog, AppError> {
        let action = action.trim();
        let description = description.trim();
        if action.is_empty() || description.is_empty() {
            return Err(AppError::validation("Action and description are required"));
        }
        let metadata = match metadata {
            None | Some(serde_json::Value::Null) => serde_json::json!({}),
            Some(value @ serde_json::Value::Object(_)) => value,
            Some(_) => return Err(AppError::validation("metadata must be a JSON object")),
        };

        self.logger
            .record(Some(ctx.user_id), action, description, metadata, &ctx.client)
            .await
            .ok_or_else(|| AppError::internal("Failed to create log"))
    }

    /// Dashboard figures as of `now`.
    pub async fn dashboard(&self, now: DateTime<Utc>) -> Result<DashboardStats, AppError> {
        let roles = self.users.count_by_role().await?;
        let active_users = self
            .users
            .count_logged_in_since(now - Duration::hours(24))
            .await?;
        let alerts = self.alerts.count_by_status().await?;
        let today = self.activity.count_since(start_of_day(now)).await?;
        let recent = self
            .activity
            .list(
                &ActivityFilter::default(),
                PageRequest::new(1, DASHBOARD_RECENT_LIMIT),
            )
            .await?;

        Ok(DashboardStats {
            users: UserActivityStats {
                total: roles.total,
                active: active_users,
            },
            alerts: AlertActivityStats {
                total: alerts.total,
                active: alerts.active,
                resolved: alerts.resolved,
            },
            activities: ActivityStats {
                today,
                recent: self.with_users(recent.items).await?,
            },
        })
    }

    /// Delete entries older than `days` days.
    pub async fn cleanup(&self, days: i64) -> Result<CleanupReport, AppError> {
        if days < 0 {
            return Err(AppError::validation("days must not be negative"));
        }
        let cutoff = Duration::try_days(days)
            .and_then(|age| Utc::now().checked_sub_signed(age))
            .ok_or_else(|| AppError::validation("days is out of range"))?;
        let deleted_count = self.activity.delete_older_than(cutoff).await?;
        info!(days, deleted_count, "Activity logs pruned");
        Ok(CleanupReport {
            days,
            deleted_count,
        })
    }

    async fn with_users(&self, logs: Vec<ActivityLog>) -> Result<Vec<ActivityLogView>, AppError> {
        let mut ids: Vec<Uuid> = logs.iter().filter_map(|l| l.user_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let users: HashMap<Uuid, UserRef> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, u.to_ref()))
            .collect();

        Ok(logs
            .into_iter()
            .map(|log| {
                let user = log.user_id.and_then(|id| users.get(&id).cloned());
                ActivityLogView { log, user }
            })
            .collect())
    }
}

fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}
