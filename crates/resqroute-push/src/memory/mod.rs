//! Recording push provider.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashSet;
use tokio::sync::Mutex;
use tracing::info;

use resqroute_core::AppError;
use resqroute_core::result::AppResult;

use crate::message::PushMessage;
use crate::provider::{PushProvider, redact_token};

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPush {
    pub token: String,
    pub message: PushMessage,
}

/// Logs notifications and keeps them in memory instead of delivering them.
///
/// Cloning shares the recorded list, so a test can keep a handle while the
/// application owns another.
#[derive(Debug, Clone, Default)]
pub struct MemoryPushProvider {
    sent: Arc<Mutex<Vec<SentPush>>>,
    failing_tokens: Arc<DashSet<String>>,
    fail_all: Arc<AtomicBool>,
    counter: Arc<AtomicU64>,
}

impl MemoryPushProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every send to `token` fail.
    pub fn fail_token(&self, token: &str) {
        self.failing_tokens.insert(token.to_string());
    }

    /// Make every send fail (or succeed again).
    pub fn set_fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// Everything delivered so far, oldest first.
    pub async fn sent(&self) -> Vec<SentPush> {
        self.sent.lock().await.clone()
    }

    /// Messages delivered to `token`.
    pub async fn sent_to(&self, token: &str) -> Vec<PushMessage> {
        self.sent
            .lock()
            .await
            .iter()
            .filter(|p| p.token == token)
            .map(|p| p.message.clone())
            .collect()
    }
}

#[async_trait]
impl PushProvider for MemoryPushProvider {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn send(&self, token: &str, message: &PushMessage) -> AppResult<String> {
        if self.fail_all.load(Ordering::SeqCst) || self.failing_tokens.contains(token) {
            return Err(AppError::external("Requested entity was not found."));
        }

        info!(token = %redact_token(token), title = %message.title, "Push recorded");
        self.sent.lock().await.push(SentPush {
            token: token.to_string(),
            message: message.clone(),
        });
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(format!("memory/messages/{n}"))
    }
}
