//! Push token registration and test notifications.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

use resqroute_core::error::AppError;
use resqroute_database::UserStore;
use resqroute_entity::activity::action;
use resqroute_entity::user::User;
use resqroute_push::provider::redact_token;
use resqroute_push::{PushManager, PushMessage};

use crate::activity::ActivityLogger;
use crate::context::RequestContext;

/// A test push that reached the provider.
#[derive(Debug, Clone)]
pub struct TestDelivery {
    /// Provider message identifier.
    pub message_id: String,
    pub user: User,
}

/// Per-user push operations.
#[derive(Debug, Clone)]
pub struct NotificationService {
    users: Arc<dyn UserStore>,
    push: PushManager,
    logger: ActivityLogger,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(users: Arc<dyn UserStore>, push: PushManager, logger: ActivityLogger) -> Self {
        Self {
            users,
            push,
            logger,
        }
    }

    /// Register the caller's device token.
    pub async fn register_token(
        &self,
        ctx: &RequestContext,
        token: &str,
    ) -> Result<User, AppError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::validation("FCM token required"));
        }

        let user = self
            .users
            .register_push_token(ctx.user_id, token)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.logger
            .record(
                Some(user.id),
                action::FCM_REGISTERED,
                format!("{} registered a device for notifications", user.name),
                json!({ "tokenCount": user.fcm_tokens.len() }),
                &ctx.client,
            )
            .await;

        info!(user_id = %user.id, token = %redact_token(token), "Push token registered");
        Ok(user)
    }

    /// Send a test notification to the caller's current token.
    pub async fn send_test(&self, ctx: &RequestContext) -> Result<TestDelivery, AppError> {
        let user = self
            .users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        let token = user.push_token().map(String::from).ok_or_else(|| {
            AppError::validation(
                "No FCM token registered. Please log in again to register for notifications.",
            )
        })?;

        let message = PushMessage::new(
            "🚨 Test Emergency Alert",
            "This is a test notification from ResQroute",
        )
        .with_data("type", "test")
        .with_data("timestamp", Utc::now().to_rfc3339());

        let message_id = self.push.send(&token, &message).await.map_err(|e| {
            error!(user_id = %user.id, error = %e, "Test notification failed");
            AppError::external("Failed to send notification")
        })?;

        info!(user_id = %user.id, message_id = %message_id, "Test notification sent");
        Ok(TestDelivery { message_id, user })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resqroute_core::error::ErrorKind;
    use resqroute_database::Stores;
    use resqroute_entity::user::{CreateUser, UserRole};
    use resqroute_push::MemoryPushProvider;

    use crate::context::ClientInfo;

    async fn setup() -> (NotificationService, MemoryPushProvider, RequestContext) {
        let stores = Stores::in_memory();
        let user = stores
            .users
            .create(&CreateUser {
                name: "Meera".to_string(),
                email: "meera@example.com".to_string(),
                password_hash: "hash".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap();
        let provider = MemoryPushProvider::new();
        let svc = NotificationService::new(
            stores.users.clone(),
            PushManager::from_provider(Arc::new(provider.clone()), 2),
            ActivityLogger::new(stores.activity.clone()),
        );
        let ctx = RequestContext::new(
            user.id,
            user.role,
            user.name,
            user.email,
            ClientInfo::default(),
        );
        (svc, provider, ctx)
    }

    #[tokio::test]
    async fn test_register_requires_token() {
        let (svc, _, ctx) = setup().await;
        let err = svc.register_token(&ctx, "  ").await.unwrap_err();
        assert_eq!(err.message, "FCM token required");
    }

    #[tokio::test]
    async fn test_send_without_token() {
        let (svc, _, ctx) = setup().await;
        let err = svc.send_test(&ctx).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(err.message.starts_with("No FCM token registered"));
    }

    #[tokio::test]
    async fn test_register_then_send() {
        let (svc, provider, ctx) = setup().await;
        let user = svc.register_token(&ctx, "device-1").await.unwrap();
        assert_eq!(user.fcm_token.as_deref(), Some("device-1"));

        let delivery = svc.send_test(&ctx).await.unwrap();
        assert!(!delivery.message_id.is_empty());
        let sent = provider.sent_to("device-1").await;
        assert_eq!(sent[0].title, "🚨 Test Emergency Alert");
        assert_eq!(sent[0].data["type"], "test");
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_external() {
        let (svc, provider, ctx) = setup().await;
        svc.register_token(&ctx, "device-1").await.unwrap();
        provider.set_fail_all(true);
        let err = svc.send_test(&ctx).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::ExternalService);
        assert_eq!(err.message, "Failed to send notification");
    }
}
