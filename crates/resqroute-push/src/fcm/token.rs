//! OAuth2 access tokens for the FCM API.
//!
//! A short-lived RS256 assertion signed with the service-account key is
//! exchanged for a bearer token (JWT bearer grant). The bearer token is
//! cached until shortly before Google expires it.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use tracing::debug;

use resqroute_core::AppError;
use resqroute_core::error::ErrorKind;

use super::credentials::ServiceAccountKey;

/// OAuth scope for sending FCM messages.
pub const MESSAGING_SCOPE: &str = "https://www.googleapis.com/auth/firebase.messaging";

/// Lifetime Google grants for an access token.
const TOKEN_LIFETIME_SECS: i64 = 3600;

/// How long a fetched token is reused; renewal happens five minutes early.
const CACHE_TTL: Duration = Duration::from_secs(3300);

const CACHE_KEY: &str = "fcm";

#[derive(Debug, Serialize)]
struct AssertionClaims<'a> {
    iss: &'a str,
    scope: &'a str,
    aud: &'a str,
    iat: i64,
    exp: i64,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Mints and caches access tokens for one service account.
#[derive(Clone)]
pub struct AccessTokenSource {
    key: Arc<ServiceAccountKey>,
    signing_key: EncodingKey,
    http: reqwest::Client,
    cache: Cache<&'static str, Arc<String>>,
}

impl std::fmt::Debug for AccessTokenSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessTokenSource")
            .field("client_email", &self.key.client_email)
            .finish()
    }
}

impl AccessTokenSource {
    /// Create a token source for `key`.
    pub fn new(key: ServiceAccountKey, http: reqwest::Client) -> Result<Self, AppError> {
        let signing_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                "Service-account private key is not a valid RSA PEM",
                e,
            )
        })?;

        Ok(Self {
            key: Arc::new(key),
            signing_key,
            http,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CACHE_TTL)
                .build(),
        })
    }

    /// A valid bearer token, fetching a new one when the cached one is stale.
    ///
    /// Concurrent callers share a single in-flight fetch.
    pub async fn access_token(&self) -> Result<Arc<String>, AppError> {
        self.cache
            .try_get_with(CACHE_KEY, self.fetch())
            .await
            .map_err(|e: Arc<AppError>| AppError::new(e.kind, e.message.clone()))
    }

    /// Build the signed assertion sent to the token endpoint.
    fn assertion(&self) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = AssertionClaims {
            iss: &self.key.client_email,
            scope: MESSAGING_SCOPE,
            aud: &self.key.token_uri,
            iat: now,
            exp: now + TOKEN_LIFETIME_SECS,
        };
        encode(&Header::new(Algorithm::RS256), &claims, &self.signing_key)
            .map_err(|e| AppError::internal(format!("Failed to sign OAuth assertion: {e}")))
    }

    async fn fetch(&self) -> Result<Arc<String>, AppError> {
        let assertion = self.assertion()?;
        debug!(token_uri = %self.key.token_uri, "Requesting FCM access token");

        let response = self
            .http
            .post(&self.key.token_uri)
            .form(&[
                ("grant_type", "urn:ietf:params:oauth:grant-type:jwt-bearer"),
                ("assertion", assertion.as_str()),
            ])
            .send()
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::ExternalService, "OAuth token request failed", e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::external(format!(
                "OAuth token request rejected ({status}): {body}"
            )));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            AppError::with_source(ErrorKind::ExternalService, "Malformed OAuth token response", e)
        })?;
        Ok(Arc::new(token.access_token))
    }
}
