//! Best-effort activity logging.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use resqroute_database::ActivityStore;
use resqroute_entity::activity::{ActivityLog, NewActivityLog};

use crate::context::ClientInfo;

/// Writes audit entries without ever failing the caller.
///
/// A store error is logged at `warn` and swallowed; the operation that
/// triggered the entry has already succeeded.
#[derive(Debug, Clone)]
pub struct ActivityLogger {
    store: Arc<dyn ActivityStore>,
}

impl ActivityLogger {
    /// Create a logger over `store`.
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Record an entry.
    pub async fn record(
        &self,
        user_id: Option<Uuid>,
        action: &str,
        description: impl Into<String>,
        metadata: serde_json::Value,
        client: &ClientInfo,
    ) -> Option<ActivityLog> {
        let entry = NewActivityLog::new(user_id, action, description)
            .with_metadata(metadata)
            .with_client(client.ip_address.clone(), client.user_agent.clone());

        match self.store.append(&entry).await {
            Ok(log) => {
                debug!(action = %log.action, user_id = ?log.user_id, "Activity logged");
                Some(log)
            }
            Err(e) => {
                warn!(action = %action, error = %e, "Failed to log activity");
                None
            }
        }
    }
}
