//! Push manager that dispatches to the configured provider.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use resqroute_core::config::{PushConfig, PushProviderKind};
use resqroute_core::result::AppResult;

use crate::fcm::FcmClient;
use crate::memory::MemoryPushProvider;
use crate::message::{MulticastReport, PushMessage};
use crate::provider::{PushProvider, redact_token};

/// Wraps the configured [`PushProvider`] and adds multicast delivery.
///
/// Multicast sends one request per token, at most `concurrency` at a time,
/// and counts successes and failures. A failing token never aborts the rest.
#[derive(Debug, Clone)]
pub struct PushManager {
    inner: Arc<dyn PushProvider>,
    concurrency: usize,
}

impl PushManager {
    /// Create a push manager from configuration.
    pub async fn new(config: &PushConfig) -> AppResult<Self> {
        let inner: Arc<dyn PushProvider> = match config.provider {
            PushProviderKind::Fcm => {
                info!(project_id = %config.fcm.project_id, "Initializing FCM push provider");
                Arc::new(FcmClient::from_config(&config.fcm).await?)
            }
            PushProviderKind::Memory => {
                info!("Initializing in-memory push provider");
                Arc::new(MemoryPushProvider::new())
            }
        };
        Ok(Self::from_provider(inner, config.multicast_concurrency))
    }

    /// Create a push manager from an existing provider (for testing).
    pub fn from_provider(provider: Arc<dyn PushProvider>, concurrency: usize) -> Self {
        Self {
            inner: provider,
            concurrency: concurrency.max(1),
        }
    }

    /// Name of the wrapped provider.
    pub fn provider_name(&self) -> &'static str {
        self.inner.name()
    }

    /// Deliver to a single token.
    pub async fn send(&self, token: &str, message: &PushMessage) -> AppResult<String> {
        let id = self.inner.send(token, message).await?;
        debug!(token = %redact_token(token), message_id = %id, "Push delivered");
        Ok(id)
    }

    /// Deliver the same message to many tokens.
    pub async fn send_multicast(&self, tokens: &[String], message: &PushMessage) -> MulticastReport {
        let message = Arc::new(message.clone());
        let deliveries: Vec<_> = tokens
            .iter()
            .map(|token| deliver(Arc::clone(&self.inner), token.clone(), Arc::clone(&message)))
            .collect();
        let outcomes: Vec<bool> = stream::iter(deliveries)
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        let success_count = outcomes.iter().filter(|ok| **ok).count();
        let report = MulticastReport {
            success_count,
            failure_count: outcomes.len() - success_count,
        };
        info!(
            sent = report.success_count,
            total = tokens.len(),
            title = %message.title,
            "Multicast finished"
        );
        report
    }
}

/// One multicast delivery. Owns its inputs so the future is `'static`.
async fn deliver(provider: Arc<dyn PushProvider>, token: String, message: Arc<PushMessage>) -> bool {
    match provider.send(&token, &message).await {
        Ok(_) => true,
        Err(e) => {
            warn!(
                provider = provider.name(),
                token = %redact_token(&token),
                error = %e,
                "Push delivery failed"
            );
            false
        }
    }
}
