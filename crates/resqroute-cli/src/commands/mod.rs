//! CLI command definitions and dispatch.

pub mod logs;
pub mod migrate;
pub mod serve;
pub mod simulate;
pub mod user;

use clap::{Parser, Subcommand};

use resqroute_core::config::AppConfig;
use resqroute_core::error::AppError;
use resqroute_database::Stores;

use crate::output::OutputFormat;

/// ResQroute: emergency alert dispatch backend
#[derive(Debug, Parser)]
#[command(name = "resqroute", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Environment overlay (`config/<env>.toml`)
    #[arg(short, long, env = "RESQROUTE_ENV", default_value = "development")]
    pub env: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the API server
    Serve(serve::ServeArgs),
    /// Database migration management
    Migrate(migrate::MigrateArgs),
    /// User management
    User(user::UserArgs),
    /// Activity log maintenance
    Logs(logs::LogsArgs),
    /// Run the proximity simulations in the terminal
    Simulate(simulate::SimulateArgs),
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self) -> Result<(), AppError> {
        match &self.command {
            Commands::Serve(args) => serve::execute(args, &self.config, &self.env).await,
            Commands::Migrate(args) => migrate::execute(args, &self.config, &self.env).await,
            Commands::User(args) => user::execute(args, &self.config, &self.env, self.format).await,
            Commands::Logs(args) => logs::execute(args, &self.config, &self.env).await,
            Commands::Simulate(args) => simulate::execute(args, self.format).await,
        }
    }

    /// Log level when `RUST_LOG` is unset. Long-running commands log at
    /// `info`; one-shot admin commands stay quiet.
    pub fn default_log_level(&self) -> &'static str {
        match self.command {
            Commands::Serve(_) | Commands::Simulate(_) => "info",
            _ => "warn",
        }
    }
}

/// Helper: load configuration from file and environment
pub fn load_config(config_path: &str, env: &str) -> Result<AppConfig, AppError> {
    AppConfig::load(config_path, env)
}

/// Helper: open the configured stores
pub async fn open_stores(config: &AppConfig) -> Result<Stores, AppError> {
    let stores = Stores::connect(&config.database).await?;
    if stores.pool.is_none() {
        crate::output::print_warning(
            "database.provider is \"memory\"; changes are lost when this command exits",
        );
    }
    Ok(stores)
}
