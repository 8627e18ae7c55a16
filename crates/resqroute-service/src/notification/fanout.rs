//! Push fan-out for alert lifecycle events.
//!
//! Each audience is a separate stage. A stage that fails to load recipients
//! is reported and skipped; the others still run, and nothing here fails the
//! alert operation that triggered it.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use resqroute_database::UserStore;
use resqroute_entity::alert::Alert;
use resqroute_entity::user::{User, UserRole};
use resqroute_push::{MulticastReport, PushManager, PushMessage};

/// Who a stage notifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Audience {
    Admins,
    Drivers,
    NearbyUsers,
    AllUsers,
}

impl Audience {
    fn role(&self) -> Option<UserRole> {
        match self {
            Self::Admins => Some(UserRole::Admin),
            Self::Drivers => Some(UserRole::Driver),
            Self::NearbyUsers => Some(UserRole::User),
            Self::AllUsers => None,
        }
    }
}

/// Result of one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "status")]
pub enum StageStatus {
    /// Messages were handed to the push provider.
    Sent {
        #[serde(flatten)]
        report: MulticastReport,
    },
    /// Nothing to send.
    Skipped { reason: String },
    /// Recipients could not be loaded.
    Failed { error: String },
}

/// One audience and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageOutcome {
    pub audience: Audience,
    #[serde(flatten)]
    pub status: StageStatus,
}

/// Per-stage results of a fan-out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FanoutReport {
    pub stages: Vec<StageOutcome>,
}

impl FanoutReport {
    /// Total messages accepted by the provider across stages.
    pub fn delivered(&self) -> usize {
        self.stages
            .iter()
            .map(|s| match &s.status {
                StageStatus::Sent { report } => report.success_count,
                _ => 0,
            })
            .sum()
    }

    /// The outcome for `audience`, if that stage ran.
    pub fn stage(&self, audience: Audience) -> Option<&StageStatus> {
        self.stages
            .iter()
            .find(|s| s.audience == audience)
            .map(|s| &s.status)
    }
}

/// Sends alert notifications to the right audiences.
#[derive(Debug, Clone)]
pub struct NotificationFanout {
    users: Arc<dyn UserStore>,
    push: PushManager,
    nearby_limit: usize,
}

impl NotificationFanout {
    /// Creates a new fan-out over `users` and `push`.
    pub fn new(users: Arc<dyn UserStore>, push: PushManager, nearby_limit: usize) -> Self {
        Self {
            users,
            push,
            nearby_limit,
        }
    }

    /// Notify admins, drivers and, when the alert has coordinates, nearby
    /// users about a new alert.
    pub async fn alert_created(&self, alert: &Alert) -> FanoutReport {
        let mut report = FanoutReport::default();

        let admin_msg = alert_message(
            alert,
            "🚨 NEW EMERGENCY ALERT",
            format!(
                "{}: {} at {}",
                alert.alert_type.as_str().to_uppercase(),
                alert.message,
                alert.location
            ),
            "admin_review",
        );
        report
            .stages
            .push(self.run_stage(Audience::Admins, None, &admin_msg).await);

        let driver_msg = alert_message(
            alert,
            "🚑 EMERGENCY DISPATCH",
            format!(
                "{} alert: {}",
                alert.alert_type.as_str().to_uppercase(),
                alert.message
            ),
            "respond_to_emergency",
        );
        report
            .stages
            .push(self.run_stage(Audience::Drivers, None, &driver_msg).await);

        if alert.coordinates.is_zero() {
            report.stages.push(StageOutcome {
                audience: Audience::NearbyUsers,
                status: StageStatus::Skipped {
                    reason: "Alert has no coordinates".to_string(),
                },
            });
        } else {
            let user_msg = alert_message(
                alert,
                "⚠️ CLEAR ROUTE AHEAD",
                format!(
                    "Emergency vehicle approaching near {}. Please clear the route.",
                    alert.location
                ),
                "clear_route",
            );
            report.stages.push(
                self.run_stage(Audience::NearbyUsers, Some(self.nearby_limit), &user_msg)
                    .await,
            );
        }

        info!(
            alert_id = %alert.id,
            delivered = report.delivered(),
            "Alert notifications dispatched"
        );
        report
    }

    /// Tell everyone with a push token that an alert was resolved.
    pub async fn alert_resolved(&self, alert: &Alert) -> FanoutReport {
        let message = PushMessage::new(
            "✅ ALERT RESOLVED",
            format!(
                "{} alert at {} has been resolved.",
                alert.alert_type.as_str().to_uppercase(),
                alert.location
            ),
        )
        .with_data("alertId", alert.id)
        .with_data("type", alert.alert_type)
        .with_data("action", "alert_resolved");

        let report = FanoutReport {
            stages: vec![self.run_stage(Audience::AllUsers, None, &message).await],
        };
        info!(
            alert_id = %alert.id,
            delivered = report.delivered(),
            "Resolution notifications dispatched"
        );
        report
    }

    async fn run_stage(
        &self,
        audience: Audience,
        limit: Option<usize>,
        message: &PushMessage,
    ) -> StageOutcome {
        let status = match self.users.find_push_recipients(audience.role(), limit).await {
            Err(e) => {
                warn!(audience = ?audience, error = %e, "Failed to load push recipients");
                StageStatus::Failed {
                    error: e.message.clone(),
                }
            }
            Ok(users) => {
                let tokens = push_tokens(&users);
                if tokens.is_empty() {
                    StageStatus::Skipped {
                        reason: "No recipients with push tokens".to_string(),
                    }
                } else {
                    StageStatus::Sent {
                        report: self.push.send_multicast(&tokens, message).await,
                    }
                }
            }
        };
        StageOutcome { audience, status }
    }
}

fn push_tokens(users: &[User]) -> Vec<String> {
    users
        .iter()
        .filter_map(|u| u.push_token())
        .map(String::from)
        .collect()
}

fn alert_message(alert: &Alert, title: &str, body: String, action: &str) -> PushMessage {
    PushMessage::new(title, body)
        .with_data("alertId", alert.id)
        .with_data("type", alert.alert_type)
        .with_data("location", &alert.location)
        .with_data("priority", alert.priority)
        .with_data("action", action)
        .with_data("latitude", alert.coordinates.latitude)
        .with_data("longitude", alert.coordinates.longitude)
}
