//! Database migration commands.

use clap::{Args, Subcommand};

use resqroute_core::config::DatabaseProvider;
use resqroute_core::error::AppError;
use resqroute_database::DatabasePool;
use resqroute_database::connection::mask_password;
use resqroute_database::migration::run_migrations;

use crate::output;

/// Arguments for the migrate command
#[derive(Debug, Args)]
pub struct MigrateArgs {
    /// Migration subcommand
    #[command(subcommand)]
    pub command: MigrateCommand,
}

/// Migration subcommands
#[derive(Debug, Subcommand)]
pub enum MigrateCommand {
    /// Run all pending migrations
    Run,
}

/// Execute migration commands
pub async fn execute(args: &MigrateArgs, config_path: &str, env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    if config.database.provider != DatabaseProvider::Postgres {
        return Err(AppError::configuration(
            "Migrations require database.provider = \"postgres\"",
        ));
    }

    match &args.command {
        MigrateCommand::Run => {
            output::print_kv("Database", &mask_password(&config.database.url));
            let db = DatabasePool::connect(&config.database).await?;
            run_migrations(db.pool()).await?;
            db.close().await;
            output::print_success("All migrations applied successfully.");
        }
    }

    Ok(())
}
