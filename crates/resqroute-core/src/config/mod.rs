//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section, and every section has a usable `Default` so the server can run
//! in memory mode without any file present.

pub mod activity;
pub mod app;
pub mod auth;
pub mod database;
pub mod logging;
pub mod push;

use serde::{Deserialize, Serialize};

pub use self::activity::ActivityConfig;
pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::{DatabaseConfig, DatabaseProvider};
pub use self::logging::LoggingConfig;
pub use self::push::{FcmConfig, PushConfig, PushProviderKind};

use crate::error::AppError;

/// Prefix for structured environment overrides (`RESQROUTE__AUTH__JWT_SECRET`).
const ENV_PREFIX: &str = "RESQROUTE";

/// Root application configuration.
///
/// The top-level deserialization target for the merged configuration
/// (default file, environment overlay, then environment variables).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Persistence settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Token and password settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Push notification settings.
    #[serde(default)]
    pub push: PushConfig,
    /// Activity log retention settings.
    #[serde(default)]
    pub activity: ActivityConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file, an environment overlay and the
    /// process environment.
    ///
    /// `.env` is read first so its values are visible to every later source.
    /// The bare `JWT_SECRET`, `DATABASE_URL` and `PORT` variables win over
    /// everything else.
    pub fn load(path: &str, env: &str) -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        let config = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let mut config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply the conventional single-variable overrides.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(secret) = lookup("JWT_SECRET").filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = secret;
        }
        if let Some(url) = lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            self.database.url = url;
        }
        if let Some(port) = lookup("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
    }

    /// Reject configurations the server cannot start with.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.auth.jwt_ttl_hours == 0 {
            return Err(AppError::configuration("auth.jwt_ttl_hours must be positive"));
        }
        if self.database.provider == DatabaseProvider::Postgres && self.database.url.is_empty() {
            return Err(AppError::configuration(
                "database.url is required when database.provider = \"postgres\"",
            ));
        }
        if self.push.provider == PushProviderKind::Fcm
            && self.push.fcm.service_account_path.is_empty()
        {
            return Err(AppError::configuration(
                "push.fcm.service_account_path is required when push.provider = \"fcm\"",
            ));
        }
        if self.auth.jwt_secret == auth::DEFAULT_JWT_SECRET {
            tracing::warn!("auth.jwt_secret is the built-in default; set JWT_SECRET in production");
        }
        Ok(())
    }

    /// Configuration suitable for tests and local demos: memory stores,
    /// recording push provider, fixed secret.
    pub fn in_memory() -> Self {
        let mut config = Self::default();
        config.database.provider = DatabaseProvider::Memory;
        config.push.provider = PushProviderKind::Memory;
        config.auth.jwt_secret = "resqroute-test-secret".to_string();
        config
    }
}
