//! Activity log repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use resqroute_core::error::{AppError, ErrorKind};
use resqroute_core::result::AppResult;
use resqroute_core::types::pagination::{PageRequest, PageResponse};
use resqroute_entity::activity::{ActivityFilter, ActivityLog, NewActivityLog};

use crate::store::ActivityStore;

/// PostgreSQL-backed [`ActivityStore`].
#[derive(Debug, Clone)]
pub struct ActivityRepository {
    pool: PgPool,
}

impl ActivityRepository {
    /// Create a new activity repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityRepository {
    async fn append(&self, entry: &NewActivityLog) -> AppResult<ActivityLog> {
        sqlx::query_as::<_, ActivityLog>(
            "INSERT INTO activity_logs (id, user_id, action, description, ip_address, \
                                        user_agent, metadata) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(entry.user_id)
        .bind(&entry.action)
        .bind(&entry.description)
        .bind(&entry.ip_address)
        .bind(&entry.user_agent)
        .bind(&entry.metadata)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to write activity log", e))
    }

    async fn list(
        &self,
        filter: &ActivityFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<ActivityLog>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM activity_logs \
             WHERE ($1::uuid IS NULL OR user_id = $1) AND ($2::text IS NULL OR action = $2)",
        )
        .bind(filter.user_id)
        .bind(&filter.action)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count activity logs", e))?;

        let logs = sqlx::query_as::<_, ActivityLog>(
            "SELECT * FROM activity_logs \
             WHERE ($1::uuid IS NULL OR user_id = $1) AND ($2::text IS NULL OR action = $2) \
             ORDER BY created_at DESC LIMIT $3 OFFSET $4",
        )
        .bind(filter.user_id)
        .bind(&filter.action)
        .bind(page.limit as i64)
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list activity logs", e))?;

        Ok(PageResponse::new(logs, page, total as u64))
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_logs WHERE created_at >= $1")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to count activity logs", e)
            })
    }

    async fn delete_older_than(&self, cutoff: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM activity_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to prune activity logs", e)
            })?;
        Ok(result.rows_affected())
    }
}
