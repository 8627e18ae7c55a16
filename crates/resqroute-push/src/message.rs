//! Notification payload and delivery reports.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A notification with a title, a body and string-only data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Notification title.
    pub title: String,
    /// Notification body.
    pub body: String,
    /// Data payload. FCM only accepts string values.
    pub data: BTreeMap<String, String>,
}

impl PushMessage {
    /// Create a message with an empty data payload.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            data: BTreeMap::new(),
        }
    }

    /// Add one data entry.
    pub fn with_data(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.data.insert(key.into(), value.to_string());
        self
    }
}

/// Outcome of sending one message to many tokens.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MulticastReport {
    /// Tokens the provider accepted.
    pub success_count: usize,
    /// Tokens the provider rejected.
    pub failure_count: usize,
}

impl MulticastReport {
    /// Total number of tokens attempted.
    pub fn attempted(&self) -> usize {
        self.success_count + self.failure_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_values_are_strings() {
        let msg = PushMessage::new("t", "b")
            .with_data("latitude", 28.6139)
            .with_data("action", "clear_route");
        assert_eq!(msg.data["latitude"], "28.6139");
        assert_eq!(msg.data["action"], "clear_route");
    }
}
