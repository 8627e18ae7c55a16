//! Alert lifecycle: raise, query, edit, resolve, delete.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use resqroute_core::error::AppError;
use resqroute_database::{AlertStore, UserStore};
use resqroute_entity::activity::action;
use resqroute_entity::alert::{
    Alert, AlertFilter, AlertPriority, AlertStatus, AlertType, Coordinates, CreateAlert,
    UpdateAlert,
};
use resqroute_entity::user::UserRef;
use resqroute_geo::haversine_meters;

use crate::activity::ActivityLogger;
use crate::context::RequestContext;
use crate::notification::{FanoutReport, NotificationFanout};

/// Search radius used when the caller gives none.
pub const DEFAULT_NEARBY_RADIUS_METERS: f64 = 5000.0;

/// Raw alert input. Required fields are checked by the service so a missing
/// value yields the same message whatever the transport.
#[derive(Debug, Clone, Default)]
pub struct CreateAlertInput {
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub priority: Option<String>,
}

/// Edit input; `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct UpdateAlertInput {
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub priority: Option<String>,
}

/// An alert with its creator embedded.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertView {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub message: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub priority: AlertPriority,
    pub status: AlertStatus,
    /// The creator, or `None` if unknown or deleted.
    pub created_by: Option<UserRef>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub timestamp: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertView {
    fn new(alert: Alert, created_by: Option<UserRef>) -> Self {
        Self {
            id: alert.id,
            alert_type: alert.alert_type,
            message: alert.message,
            location: alert.location,
            coordinates: alert.coordinates,
            priority: alert.priority,
            status: alert.status,
            created_by,
            resolved_at: alert.resolved_at,
            timestamp: alert.timestamp,
            created_at: alert.created_at,
            updated_at: alert.updated_at,
        }
    }
}

/// An active alert and how far it is from the query point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyAlert {
    #[serde(flatten)]
    pub alert: AlertView,
    pub distance_meters: f64,
}

/// Alert operations.
#[derive(Debug, Clone)]
pub struct AlertService {
    alerts: Arc<dyn AlertStore>,
    users: Arc<dyn UserStore>,
    fanout: NotificationFanout,
    logger: ActivityLogger,
}

impl AlertService {
    /// Creates a new alert service.
    pub fn new(
        alerts: Arc<dyn AlertStore>,
        users: Arc<dyn UserStore>,
        fanout: NotificationFanout,
        logger: ActivityLogger,
    ) -> Self {
        Self {
            alerts,
            users,
            fanout,
            logger,
        }
    }

    /// Raise an alert and notify the relevant audiences.
    pub async fn create(
        &self,
        ctx: &RequestContext,
        input: CreateAlertInput,
    ) -> Result<(AlertView, FanoutReport), AppError> {
        let (Some(kind), Some(message), Some(location)) = (
            non_blank(input.alert_type),
            non_blank(input.message),
            non_blank(input.location),
        ) else {
            return Err(AppError::validation("Missing type, message, or location"));
        };

        let data = CreateAlert {
            alert_type: kind.parse()?,
            message,
            location,
            coordinates: Coordinates::from_input(input.latitude, input.longitude)?,
            priority: match non_blank(input.priority) {
                Some(p) => p.parse()?,
                None => AlertPriority::default(),
            },
            created_by: Some(ctx.user_id),
        };

        // A token outlives its account; the creator must still exist.
        let creator = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let alert = self.alerts.create(&data).await?;
        info!(
            user_id = %ctx.user_id,
            alert_id = %alert.id,
            kind = %alert.alert_type,
            priority = %alert.priority,
            "Alert created"
        );

        self.logger
            .record(
                Some(ctx.user_id),
                action::ALERT_CREATED,
                format!(
                    "Created {} alert: {}",
                    alert.alert_type.as_str().to_uppercase(),
                    alert.message
                ),
                json!({
                    "alertId": alert.id,
                    "type": alert.alert_type,
                    "location": alert.location,
                    "priority": alert.priority,
                }),
                &ctx.client,
            )
            .await;

        let report = self.fanout.alert_created(&alert).await;
        Ok((AlertView::new(alert, Some(creator.to_ref())), report))
    }

    /// Alerts newest first, optionally filtered.
    pub async fn list(&self, filter: &AlertFilter) -> Result<Vec<AlertView>, AppError> {
        let alerts = self.alerts.list(filter).await?;
        self.views(alerts).await
    }

    /// One alert by ID.
    pub async fn get(&self, id: Uuid) -> Result<AlertView, AppError> {
        let alert = self.find(id).await?;
        self.view(alert).await
    }

    /// Active alerts with coordinates within `radius_meters` of the point,
    /// closest first.
    pub async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_meters: Option<f64>,
    ) -> Result<Vec<NearbyAlert>, AppError> {
        Coordinates::new(latitude, longitude).validate()?;
        let radius = radius_meters.unwrap_or(DEFAULT_NEARBY_RADIUS_METERS);
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AppError::validation("radiusMeters must be positive"));
        }

        let filter = AlertFilter {
            status: Some(AlertStatus::Active),
            alert_type: None,
        };
        let mut within: Vec<(Alert, f64)> = self
            .alerts
            .list(&filter)
            .await?
            .into_iter()
            .filter(|a| !a.coordinates.is_zero())
            .map(|a| {
                let d = haversine_meters(
                    latitude,
                    longitude,
                    a.coordinates.latitude,
                    a.coordinates.longitude,
                );
                (a, d)
            })
            .filter(|(_, d)| *d <= radius)
            .collect();
        within.sort_by(|a, b| a.1.total_cmp(&b.1));

        let (alerts, distances): (Vec<Alert>, Vec<f64>) = within.into_iter().unzip();
        let views = self.views(alerts).await?;
        Ok(views
            .into_iter()
            .zip(distances)
            .map(|(alert, distance_meters)| NearbyAlert {
                alert,
                distance_meters,
            })
            .collect())
    }

    /// Edit descriptive fields.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: UpdateAlertInput,
    ) -> Result<AlertView, AppError> {
        let coordinates = match (input.latitude, input.longitude) {
            (None, None) => None,
            (Some(lat), Some(lon)) => Some(Coordinates::from_input(Some(lat), Some(lon))?),
            _ => {
                return Err(AppError::validation(
                    "latitude and longitude must be given together",
                ));
            }
        };
        let update = UpdateAlert {
            alert_type: non_blank(input.alert_type)
                .map(|t| t.parse())
                .transpose()?,
            message: non_blank(input.message),
            location: non_blank(input.location),
            coordinates,
            priority: non_blank(input.priority)
                .map(|p| p.parse())
                .transpose()?,
        };
        if update.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        let alert = self
            .alerts
            .update(id, &update)
            .await?
            .ok_or_else(|| AppError::not_found("Alert not found"))?;

        self.logger
            .record(
                Some(ctx.user_id),
                action::ALERT_UPDATED,
                format!(
                    "Updated {} alert at {}",
                    alert.alert_type.as_str().to_uppercase(),
                    alert.location
                ),
                json!({ "alertId": alert.id }),
                &ctx.client,
            )
            .await;

        info!(user_id = %ctx.user_id, alert_id = %alert.id, "Alert updated");
        self.view(alert).await
    }

    /// Mark resolved and tell everyone. Resolving twice keeps the first
    /// resolution time.
    pub async fn resolve(
        &self,
        ctx: &RequestContext,
        id: Uuid,
    ) -> Result<(AlertView, FanoutReport), AppError> {
        let alert = self
            .alerts
            .set_status(id, AlertStatus::Resolved, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Alert not found"))?;

        self.logger
            .record(
                Some(ctx.user_id),
                action::ALERT_RESOLVED,
                format!(
                    "Resolved {} alert at {}",
                    alert.alert_type.as_str().to_uppercase(),
                    alert.location
                ),
                json!({ "alertId": alert.id, "type": alert.alert_type }),
                &ctx.client,
            )
            .await;

        info!(user_id = %ctx.user_id, alert_id = %alert.id, "Alert resolved");
        let report = self.fanout.alert_resolved(&alert).await;
        let view = self.view(alert).await?;
        Ok((view, report))
    }

    /// Set any status.
    pub async fn set_status(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        status: &str,
    ) -> Result<AlertView, AppError> {
        let status: AlertStatus = status.parse()?;
        let alert = self
            .alerts
            .set_status(id, status, Utc::now())
            .await?
            .ok_or_else(|| AppError::not_found("Alert not found"))?;

        self.logger
            .record(
                Some(ctx.user_id),
                action::ALERT_UPDATED,
                format!(
                    "Changed alert status to {} for {} alert at {}",
                    status, alert.alert_type, alert.location
                ),
                json!({ "alertId": alert.id, "newStatus": status }),
                &ctx.client,
            )
            .await;

        info!(user_id = %ctx.user_id, alert_id = %alert.id, status = %status, "Alert status changed");
        self.view(alert).await
    }

    /// Delete an alert.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<(), AppError> {
        let alert = self.find(id).await?;
        if !self.alerts.delete(id).await? {
            return Err(AppError::not_found("Alert not found"));
        }

        self.logger
            .record(
                Some(ctx.user_id),
                action::ALERT_DELETED,
                format!(
                    "Deleted {} alert at {}",
                    alert.alert_type.as_str().to_uppercase(),
                    alert.location
                ),
                json!({ "alertId": alert.id, "type": alert.alert_type }),
                &ctx.client,
            )
            .await;

        info!(user_id = %ctx.user_id, alert_id = %id, "Alert deleted");
        Ok(())
    }

    async fn find(&self, id: Uuid) -> Result<Alert, AppError> {
        self.alerts
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Alert not found"))
    }

    async fn view(&self, alert: Alert) -> Result<AlertView, AppError> {
        let creator = match alert.created_by {
            Some(id) => self.users.find_by_id(id).await?.map(|u| u.to_ref()),
            None => None,
        };
        Ok(AlertView::new(alert, creator))
    }

    async fn views(&self, alerts: Vec<Alert>) -> Result<Vec<AlertView>, AppError> {
        let mut ids: Vec<Uuid> = alerts.iter().filter_map(|a| a.created_by).collect();
        ids.sort_unstable();
        ids.dedup();
        let creators: HashMap<Uuid, UserRef> = self
            .users
            .find_by_ids(&ids)
            .await?
            .iter()
            .map(|u| (u.id, u.to_ref()))
            .collect();

        Ok(alerts
            .into_iter()
            .map(|alert| {
                let creator = alert.created_by.and_then(|id| creators.get(&id).cloned());
                AlertView::new(alert, creator)
            })
            .collect())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
