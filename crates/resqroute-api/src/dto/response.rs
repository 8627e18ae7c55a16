//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use resqroute_entity::activity::ActivityLog;
use resqroute_entity::user::{User, UserRole};
use resqroute_service::alert::AlertView;
use resqroute_service::notification::FanoutReport;

/// Plain `{ "message": ... }` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// The account summary returned by the auth endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for SessionUser {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

/// Sign-up and login response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub user: SessionUser,
}

/// `GET /auth/me` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: SessionUser,
}

/// An alert with a status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertResponse {
    pub message: String,
    pub alert: AlertView,
}

/// An alert mutation that also pushed notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertNotifiedResponse {
    pub message: String,
    pub alert: AlertView,
    pub notifications: FanoutReport,
}

/// A user with a status message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub message: String,
    pub user: User,
}

/// Created log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogResponse {
    pub message: String,
    pub log: ActivityLog,
}

/// Retention cleanup result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupResponse {
    pub message: String,
    pub deleted_count: u64,
}

/// Recipient of a test push.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRecipient {
    pub email: String,
    pub name: String,
}

/// Test push result.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestNotificationResponse {
    pub message: String,
    pub message_id: String,
    pub user: TestRecipient,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub database: String,
    /// `postgres` or `memory`.
    pub store: String,
}
