//! Activity log retention configuration.

use serde::{Deserialize, Serialize};

/// Retention settings for the activity log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Logs older than this many days are pruned.
    #[serde(default = "default_retention_days")]
    pub retention_days: i64,
    /// Whether the scheduled prune runs.
    #[serde(default)]
    pub cleanup_enabled: bool,
    /// Six-field cron expression for the scheduled prune.
    #[serde(default = "default_cleanup_cron")]
    pub cleanup_cron: String,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            retention_days: default_retention_days(),
            cleanup_enabled: false,
            cleanup_cron: default_cleanup_cron(),
        }
    }
}

fn default_retention_days() -> i64 {
    30
}

fn default_cleanup_cron() -> String {
    "0 0 3 * * *".to_string()
}
