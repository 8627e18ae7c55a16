//! Activity log entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One append-only audit entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ActivityLog {
    /// Unique entry identifier.
    pub id: Uuid,
    /// Acting user, if known.
    pub user_id: Option<Uuid>,
    /// Action name, e.g. `alert_created`.
    pub action: String,
    /// Human-readable description.
    pub description: String,
    /// Client IP address.
    pub ip_address: Option<String>,
    /// Client User-Agent.
    pub user_agent: Option<String>,
    /// Free-form JSON object with action-specific details.
    pub metadata: serde_json::Value,
    /// When the entry was written.
    pub created_at: DateTime<Utc>,
}

/// Data for a new activity entry.
#[derive(Debug, Clone)]
pub struct NewActivityLog {
    pub user_id: Option<Uuid>,
    pub action: String,
    pub description: String,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub metadata: serde_json::Value,
}

impl NewActivityLog {
    /// Start an entry with an empty metadata object.
    pub fn new(user_id: Option<Uuid>, action: &str, description: impl Into<String>) -> Self {
        Self {
            user_id,
            action: action.to_string(),
            description: description.into(),
            ip_address: None,
            user_agent: None,
            metadata: serde_json::Value::Object(Default::default()),
        }
    }

    /// Attach metadata.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    /// Attach client information.
    pub fn with_client(mut self, ip_address: Option<String>, user_agent: Option<String>) -> Self {
        self.ip_address = ip_address;
        self.user_agent = user_agent;
        self
    }
}

/// Optional list filters.
#[derive(Debug, Clone, Default)]
pub struct ActivityFilter {
    pub user_id: Option<Uuid>,
    pub action: Option<String>,
}

impl ActivityFilter {
    /// Whether a log entry passes the filter.
    pub fn matches(&self, log: &ActivityLog) -> bool {
        self.user_id.is_none_or(|id| log.user_id == Some(id))
            && self.action.as_deref().is_none_or(|a| log.action == a)
    }
}
