//! Push provider trait.

use async_trait::async_trait;

use resqroute_core::result::AppResult;

use crate::message::PushMessage;

/// A backend that delivers one notification to one device token.
#[async_trait]
pub trait PushProvider: Send + Sync + std::fmt::Debug + 'static {
    /// Short provider name for logs.
    fn name(&self) -> &'static str;

    /// Deliver `message` to `token`, returning the provider's message ID.
    async fn send(&self, token: &str, message: &PushMessage) -> AppResult<String>;
}

/// Shorten a device token for logging.
pub fn redact_token(token: &str) -> String {
    let prefix: String = token.chars().take(12).collect();
    if prefix.len() < token.len() {
        format!("{prefix}...")
    } else {
        prefix
    }
}
