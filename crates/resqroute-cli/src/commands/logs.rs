//! Activity log maintenance commands.

use clap::{Args, Subcommand};

use resqroute_core::error::AppError;
use resqroute_service::{ActivityLogger, ActivityService};

use crate::output;

/// Arguments for the logs command
#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Logs subcommand
    #[command(subcommand)]
    pub command: LogsCommand,
}

/// Logs subcommands
#[derive(Debug, Subcommand)]
pub enum LogsCommand {
    /// Delete entries older than the retention window
    Cleanup {
        /// Age in days; defaults to `activity.retention_days`
        #[arg(short, long)]
        days: Option<i64>,
        /// Skip confirmation prompt
        #[arg(long)]
        force: bool,
    },
}

/// Execute logs commands
pub async fn execute(args: &LogsArgs, config_path: &str, env: &str) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;

    match &args.command {
        LogsCommand::Cleanup { days, force } => {
            let days = days.unwrap_or(config.activity.retention_days);
            if !force {
                let confirm = dialoguer::Confirm::new()
                    .with_prompt(format!("Delete activity logs older than {} days?", days))
                    .default(false)
                    .interact()
                    .map_err(|e| AppError::internal(format!("Input error: {}", e)))?;
                if !confirm {
                    println!("Cancelled.");
                    return Ok(());
                }
            }

            let stores = super::open_stores(&config).await?;
            let service = ActivityService::new(
                stores.activity.clone(),
                stores.users.clone(),
                stores.alerts.clone(),
                ActivityLogger::new(stores.activity.clone()),
            );
            let report = service.cleanup(days).await?;
            stores.close().await;

            output::print_success(&format!(
                "Deleted {} logs older than {} days",
                report.deleted_count, report.days
            ));
        }
    }

    Ok(())
}
