//! FCM HTTP v1 `messages:send` client.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use resqroute_core::AppError;
use resqroute_core::config::FcmConfig;
use resqroute_core::error::ErrorKind;
use resqroute_core::result::AppResult;

use super::credentials::ServiceAccountKey;
use super::token::AccessTokenSource;
use crate::message::PushMessage;
use crate::provider::PushProvider;

const FCM_ENDPOINT: &str = "https://fcm.googleapis.com/v1/projects";

#[derive(Debug, Deserialize)]
struct SendResponse {
    name: String,
}

/// Delivers notifications through Firebase Cloud Messaging.
#[derive(Debug, Clone)]
pub struct FcmClient {
    http: reqwest::Client,
    tokens: AccessTokenSource,
    send_url: String,
    android_channel_id: String,
}

impl FcmClient {
    /// Load the service-account key and build a client.
    ///
    /// `fcm.project_id` wins over the key's own project ID.
    pub async fn from_config(config: &FcmConfig) -> AppResult<Self> {
        let key = ServiceAccountKey::from_file(&config.service_account_path).await?;
        let project_id = if config.project_id.is_empty() {
            key.project_id.clone()
        } else {
            config.project_id.clone()
        };
        if project_id.is_empty() {
            return Err(AppError::configuration("push.fcm.project_id is required"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Configuration, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            tokens: AccessTokenSource::new(key, http.clone())?,
            http,
            send_url: format!("{FCM_ENDPOINT}/{project_id}/messages:send"),
            android_channel_id: config.android_channel_id.clone(),
        })
    }

    /// The v1 request body for one token.
    pub fn request_body(&self, token: &str, message: &PushMessage) -> Value {
        build_request_body(token, message, &self.android_channel_id)
    }
}

/// Build the `messages:send` body. Alerts are sent with high Android
/// priority and a vibration pattern for web clients.
fn build_request_body(token: &str, message: &PushMessage, channel_id: &str) -> Value {
    json!({
        "message": {
            "token": token,
            "notification": {
                "title": message.title,
                "body": message.body,
            },
            "data": message.data,
            "android": {
                "priority": "high",
                "notification": { "channel_id": channel_id },
            },
            "webpush": {
                "notification": {
                    "icon": "/emergency-icon.png",
                    "vibrate": [200, 100, 200],
                },
            },
        }
    })
}

#[async_trait]
impl PushProvider for FcmClient {
    fn name(&self) -> &'static str {
        "fcm"
    }

    async fn send(&self, token: &str, message: &PushMessage) -> AppResult<String> {
        let access_token = self.tokens.access_token().await?;

        let response = self
            .http
            .post(&self.send_url)
            .bearer_auth(access_token.as_str())
            .json(&self.request_body(token, message))
            .send()
            .await
            .map_err(|e| AppError::with_source(ErrorKind::ExternalService, "FCM request failed", e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!("FCM rejected message ({status}): {body}")));
        }

        let sent: SendResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed FCM response", e)
        })?;
        Ok(sent.name)
    }
}
