//! Alert entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use resqroute_core::AppError;

use super::kind::{AlertPriority, AlertStatus, AlertType};

/// A WGS84 point in decimal degrees.
///
/// `(0, 0)` is used as the "no location supplied" marker.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, FromRow)]
pub struct Coordinates {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Build coordinates from optional client input.
    ///
    /// Both values must be present and non-zero, otherwise the alert is stored
    /// at `(0, 0)`. Present values must lie within the valid degree ranges.
    pub fn from_input(latitude: Option<f64>, longitude: Option<f64>) -> Result<Self, AppError> {
        let (Some(lat), Some(lon)) = (latitude, longitude) else {
            return Ok(Self::default());
        };
        if lat == 0.0 || lon == 0.0 {
            return Ok(Self::default());
        }
        let coords = Self::new(lat, lon);
        coords.validate()?;
        Ok(coords)
    }

    /// Reject non-finite or out-of-range values.
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.latitude.is_finite() || !(-90.0..=90.0).contains(&self.latitude) {
            return Err(AppError::validation("latitude must be between -90 and 90"));
        }
        if !self.longitude.is_finite() || !(-180.0..=180.0).contains(&self.longitude) {
            return Err(AppError::validation(
                "longitude must be between -180 and 180",
            ));
        }
        Ok(())
    }

    /// Whether this is the "no location" marker.
    pub fn is_zero(&self) -> bool {
        self.latitude == 0.0 && self.longitude == 0.0
    }
}

/// An emergency alert / dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    /// Unique alert identifier.
    pub id: Uuid,
    /// Kind of emergency.
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    /// Free-text description.
    pub message: String,
    /// Free-text location (street, landmark).
    pub location: String,
    /// Point location, `(0, 0)` when unknown.
    #[sqlx(flatten)]
    pub coordinates: Coordinates,
    /// Urgency.
    pub priority: AlertPriority,
    /// Lifecycle state.
    pub status: AlertStatus,
    /// The user who raised the alert (cleared if that user is deleted).
    pub created_by: Option<Uuid>,
    /// When the alert was first resolved.
    pub resolved_at: Option<DateTime<Utc>>,
    /// When the alert was raised.
    #[sqlx(rename = "raised_at")]
    pub timestamp: DateTime<Utc>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Row update time.
    pub updated_at: DateTime<Utc>,
}

impl Alert {
    /// Whether the alert is still open.
    pub fn is_active(&self) -> bool {
        self.status == AlertStatus::Active
    }
}

/// Data required to create an alert.
#[derive(Debug, Clone)]
pub struct CreateAlert {
    pub alert_type: AlertType,
    pub message: String,
    pub location: String,
    pub coordinates: Coordinates,
    pub priority: AlertPriority,
    pub created_by: Option<Uuid>,
}

/// Editable alert fields; `None` leaves the field unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateAlert {
    pub alert_type: Option<AlertType>,
    pub message: Option<String>,
    pub location: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub priority: Option<AlertPriority>,
}

impl UpdateAlert {
    /// Whether the update changes nothing.
    pub fn is_empty(&self) -> bool {
        self.alert_type.is_none()
            && self.message.is_none()
            && self.location.is_none()
            && self.coordinates.is_none()
            && self.priority.is_none()
    }

    /// Apply the update to an in-memory alert.
    pub fn apply(&self, alert: &mut Alert) {
        if let Some(kind) = self.alert_type {
            alert.alert_type = kind;
        }
        if let Some(message) = &self.message {
            alert.message = message.clone();
        }
        if let Some(location) = &self.location {
            alert.location = location.clone();
        }
        if let Some(coords) = self.coordinates {
            alert.coordinates = coords;
        }
        if let Some(priority) = self.priority {
            alert.priority = priority;
        }
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertFilter {
    pub status: Option<AlertStatus>,
    pub alert_type: Option<AlertType>,
}

impl AlertFilter {
    /// Whether an alert passes the filter.
    pub fn matches(&self, alert: &Alert) -> bool {
        self.status.is_none_or(|s| alert.status == s)
            && self.alert_type.is_none_or(|t| alert.alert_type == t)
    }
}
