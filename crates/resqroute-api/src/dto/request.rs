//! Request DTOs with validation.
//!
//! Body fields are optional at the serde level so a missing field reaches
//! the service and gets the same message as an empty one.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use resqroute_service::alert::{CreateAlertInput, UpdateAlertInput};
use resqroute_service::auth::{LoginInput, SignupInput};
use resqroute_service::user::ProfileInput;

/// Sign-up request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<String>,
}

impl From<SignupRequest> for SignupInput {
    fn from(req: SignupRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
            password: req.password,
            role: req.role,
        }
    }
}

/// Login request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl From<LoginRequest> for LoginInput {
    fn from(req: LoginRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
        }
    }
}

/// Coordinates as sent by clients; either value may be missing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatesInput {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Create alert request body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateAlertRequest {
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<CoordinatesInput>,
    pub priority: Option<String>,
}

impl From<CreateAlertRequest> for CreateAlertInput {
    fn from(req: CreateAlertRequest) -> Self {
        let coords = req.coordinates.unwrap_or_default();
        Self {
            alert_type: req.alert_type,
            message: req.message,
            location: req.location,
            latitude: coords.latitude,
            longitude: coords.longitude,
            priority: req.priority,
        }
    }
}

/// Edit alert request body. Absent fields are left as they are.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateAlertRequest {
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<CoordinatesInput>,
    pub priority: Option<String>,
}

impl From<UpdateAlertRequest> for UpdateAlertInput {
    fn from(req: UpdateAlertRequest) -> Self {
        let coords = req.coordinates.unwrap_or_default();
        Self {
            alert_type: req.alert_type,
            message: req.message,
            location: req.location,
            latitude: coords.latitude,
            longitude: coords.longitude,
            priority: req.priority,
        }
    }
}

/// Alert status change body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusRequest {
    pub status: String,
}

/// Alert list filters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct AlertListQuery {
    pub status: Option<String>,
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
}

/// Nearby alert search.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    pub radius_meters: Option<f64>,
}

/// Role change body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleRequest {
    pub role: String,
}

/// Profile update body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileRequest {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl From<ProfileRequest> for ProfileInput {
    fn from(req: ProfileRequest) -> Self {
        Self {
            name: req.name,
            email: req.email,
        }
    }
}

/// Activity log query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, message = "limit must be at least 1"))]
    pub limit: u64,
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "page must be at least 1"))]
    pub page: u64,
}

fn default_limit() -> u64 {
    50
}

fn default_page() -> u64 {
    1
}

/// Client-created log entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CreateLogRequest {
    pub action: String,
    pub description: String,
    pub metadata: Option<serde_json::Value>,
}

/// Retention cleanup query.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CleanupQuery {
    #[serde(default = "default_retention_days")]
    #[validate(range(min = 0, message = "days must not be negative"))]
    pub days: i64,
}

fn default_retention_days() -> i64 {
    30
}

/// Push token registration body.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    pub fcm_token: String,
}
