//! Alert repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use resqroute_core::error::{AppError, ErrorKind};
use resqroute_core::result::AppResult;
use resqroute_entity::alert::{Alert, AlertFilter, AlertStatus, CreateAlert, UpdateAlert};

use crate::store::{AlertCounts, AlertStore};

/// PostgreSQL-backed [`AlertStore`].
#[derive(Debug, Clone)]
pub struct AlertRepository {
    pool: PgPool,
}

impl AlertRepository {
    /// Create a new alert repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AlertStore for AlertRepository {
    async fn create(&self, data: &CreateAlert) -> AppResult<Alert> {
        sqlx::query_as::<_, Alert>(
            "INSERT INTO alerts (id, alert_type, message, location, latitude, longitude, \
                                 priority, created_by) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(data.alert_type)
        .bind(&data.message)
        .bind(&data.location)
        .bind(data.coordinates.latitude)
        .bind(data.coordinates.longitude)
        .bind(data.priority)
        .bind(data.created_by)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create alert", e))
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>("SELECT * FROM alerts WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find alert", e))
    }

    async fn list(&self, filter: &AlertFilter) -> AppResult<Vec<Alert>> {
        sqlx::query_as::<_, Alert>(
            "SELECT * FROM alerts \
             WHERE ($1::alert_status IS NULL OR status = $1) \
               AND ($2::alert_kind IS NULL OR alert_type = $2) \
             ORDER BY raised_at DESC",
        )
        .bind(filter.status)
        .bind(filter.alert_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list alerts", e))
    }

    async fn update(&self, id: Uuid, data: &UpdateAlert) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET \
                alert_type = COALESCE($2, alert_type), \
                message = COALESCE($3, message), \
                location = COALESCE($4, location), \
                latitude = COALESCE($5, latitude), \
                longitude = COALESCE($6, longitude), \
                priority = COALESCE($7, priority), \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(data.alert_type)
        .bind(&data.message)
        .bind(&data.location)
        .bind(data.coordinates.map(|c| c.latitude))
        .bind(data.coordinates.map(|c| c.longitude))
        .bind(data.priority)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update alert", e))
    }

    async fn set_status(
        &self,
        id: Uuid,
        status: AlertStatus,
        at: DateTime<Utc>,
    ) -> AppResult<Option<Alert>> {
        sqlx::query_as::<_, Alert>(
            "UPDATE alerts SET status = $2, \
                resolved_at = CASE \
                    WHEN $2 = 'resolved'::alert_status THEN COALESCE(resolved_at, $3) \
                    WHEN $2 = 'active'::alert_status THEN NULL \
                    ELSE resolved_at END, \
                updated_at = NOW() \
             WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status)
        .bind(at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to update alert status", e)
        })
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM alerts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete alert", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn count_by_status(&self) -> AppResult<AlertCounts> {
        sqlx::query_as::<_, AlertCounts>(
            "SELECT COUNT(*) AS total, \
                    COUNT(*) FILTER (WHERE status = 'active') AS active, \
                    COUNT(*) FILTER (WHERE status = 'resolved') AS resolved, \
                    COUNT(*) FILTER (WHERE status = 'cancelled') AS cancelled \
             FROM alerts",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count alerts", e))
    }
}
