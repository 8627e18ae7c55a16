//! ResQroute Server: emergency alert dispatch backend
//!
//! Main entry point that loads configuration, opens the stores and starts
//! the HTTP API.

use tracing_subscriber::{EnvFilter, fmt};

use resqroute_core::config::{AppConfig, LoggingConfig};
use resqroute_core::error::AppError;
use resqroute_database::Stores;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("RESQROUTE_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    let env = std::env::var("RESQROUTE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&config_path, &env)
}

/// Initialize tracing/logging
fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    match config.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    // ── Step 1: Stores (connect + migrate for PostgreSQL) ────────
    tracing::info!(
        "Opening stores (provider: {:?})...",
        config.database.provider
    );
    let stores = Stores::connect(&config.database).await?;
    tracing::info!("Stores ready ({})", stores.provider_name());

    // ── Step 2: Serve until shutdown ─────────────────────────────
    resqroute_api::run_server(config, stores).await
}
