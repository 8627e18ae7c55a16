//! Push notification configuration.

use serde::{Deserialize, Serialize};

/// Which push provider delivers notifications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PushProviderKind {
    /// Firebase Cloud Messaging HTTP v1.
    Fcm,
    /// Records messages in memory and logs them.
    #[default]
    Memory,
}

/// Push delivery settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushConfig {
    /// Provider selection.
    #[serde(default)]
    pub provider: PushProviderKind,
    /// Maximum number of civilian users notified per alert.
    #[serde(default = "default_nearby_limit")]
    pub nearby_user_limit: usize,
    /// Concurrent sends per multicast.
    #[serde(default = "default_concurrency")]
    pub multicast_concurrency: usize,
    /// FCM credentials.
    #[serde(default)]
    pub fcm: FcmConfig,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            provider: PushProviderKind::default(),
            nearby_user_limit: default_nearby_limit(),
            multicast_concurrency: default_concurrency(),
            fcm: FcmConfig::default(),
        }
    }
}

/// Firebase Cloud Messaging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FcmConfig {
    /// Firebase project identifier.
    #[serde(default)]
    pub project_id: String,
    /// Path to the service-account JSON key.
    #[serde(default = "default_service_account")]
    pub service_account_path: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// Android notification channel used for alerts.
    #[serde(default = "default_channel")]
    pub android_channel_id: String,
}

impl Default for FcmConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            service_account_path: default_service_account(),
            timeout_seconds: default_timeout(),
            android_channel_id: default_channel(),
        }
    }
}

fn default_nearby_limit() -> usize {
    50
}

fn default_concurrency() -> usize {
    8
}

fn default_service_account() -> String {
    "config/firebase-service-account.json".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_channel() -> String {
    "emergency_alerts".to_string()
}
