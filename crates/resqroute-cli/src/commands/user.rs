//! User management CLI commands.

use clap::{Args, Subcommand};
use serde::Serialize;
use serde_json::json;
use tabled::Tabled;

use resqroute_core::error::AppError;
use resqroute_entity::activity::action;
use resqroute_entity::user::{User, UserRole};
use resqroute_service::auth::normalize_email;
use resqroute_service::{ActivityLogger, AuthService, ClientInfo};

use crate::output::{self, OutputFormat};

/// Arguments for user commands
#[derive(Debug, Args)]
pub struct UserArgs {
    /// User subcommand
    #[command(subcommand)]
    pub command: UserCommand,
}

/// User subcommands
#[derive(Debug, Subcommand)]
pub enum UserCommand {
    /// Create an account with any role (prompts for missing values)
    Create {
        /// Display name
        #[arg(short, long)]
        name: Option<String>,
        /// Email
        #[arg(short, long)]
        email: Option<String>,
        /// Password (will prompt if not provided)
        #[arg(short, long)]
        password: Option<String>,
        /// Role: user, driver or admin
        #[arg(short, long, default_value = "user")]
        role: String,
    },
    /// List users
    List {
        /// Filter by role
        #[arg(short, long)]
        role: Option<String>,
    },
    /// Change a user's role
    SetRole {
        /// Email of the account
        email: String,
        /// New role: user, driver or admin
        role: String,
    },
}

/// User display row for table output
#[derive(Debug, Serialize, Tabled)]
struct UserRow {
    id: String,
    name: String,
    email: String,
    role: String,
    devices: usize,
    last_login: String,
    created_at: String,
}

impl From<&User> for UserRow {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.to_string(),
            name: u.name.clone(),
            email: u.email.clone(),
            role: u.role.to_string(),
            devices: u.fcm_tokens.len(),
            last_login: u
                .last_login_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "never".to_string()),
            created_at: u.created_at.format("%Y-%m-%d %H:%M").to_string(),
        }
    }
}

fn parse_role(role: &str) -> Result<UserRole, AppError> {
    role.parse()
        .map_err(|_| AppError::validation("Invalid role. Must be one of: user, admin, driver"))
}

fn input_error(e: dialoguer::Error) -> AppError {
    AppError::internal(format!("Input error: {}", e))
}

/// Execute user commands
pub async fn execute(
    args: &UserArgs,
    config_path: &str,
    env: &str,
    format: OutputFormat,
) -> Result<(), AppError> {
    let config = super::load_config(config_path, env)?;
    let stores = super::open_stores(&config).await?;
    let logger = ActivityLogger::new(stores.activity.clone());
    let cli_client = ClientInfo {
        ip_address: None,
        user_agent: Some(format!("resqroute-cli/{}", env!("CARGO_PKG_VERSION"))),
    };

    match &args.command {
        UserCommand::Create {
            name,
            email,
            password,
            role,
        } => {
            let role = parse_role(role)?;

            let name = match name {
                Some(n) => n.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Name")
                    .interact_text()
                    .map_err(input_error)?,
            };
            let email = match email {
                Some(e) => e.clone(),
                None => dialoguer::Input::new()
                    .with_prompt("Email")
                    .interact_text()
                    .map_err(input_error)?,
            };
            let password = match password {
                Some(p) => p.clone(),
                None => dialoguer::Password::new()
                    .with_prompt("Password")
                    .with_confirmation("Confirm password", "Passwords do not match")
                    .interact()
                    .map_err(input_error)?,
            };

            let auth = AuthService::new(stores.users.clone(), logger.clone(), &config.auth);
            let user = auth.create_account(&name, &email, &password, role).await?;
            logger
                .record(
                    Some(user.id),
                    action::USER_CREATED,
                    format!("{} created as {} from the CLI", user.name, user.role),
                    json!({ "email": user.email, "role": user.role }),
                    &cli_client,
                )
                .await;

            output::print_success(&format!(
                "User '{}' created as {} (id: {})",
                user.email, user.role, user.id
            ));
        }
        UserCommand::List { role } => {
            let role = role.as_deref().map(parse_role).transpose()?;
            let users = stores.users.list(None).await?;
            let rows: Vec<UserRow> = users
                .iter()
                .filter(|u| role.is_none_or(|r| u.role == r))
                .map(UserRow::from)
                .collect();
            output::print_list(&rows, format);
        }
        UserCommand::SetRole { email, role } => {
            let role = parse_role(role)?;
            let email = normalize_email(email);
            let user = stores
                .users
                .find_by_email(&email)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))?;
            let old_role = user.role;

            let user = stores
                .users
                .update_role(user.id, role)
                .await?
                .ok_or_else(|| AppError::not_found(format!("User '{}' not found", email)))?;
            logger
                .record(
                    Some(user.id),
                    action::ROLE_CHANGED,
                    format!("Changed {}'s role from {} to {} via CLI", user.name, old_role, role),
                    json!({ "targetUserId": user.id, "oldRole": old_role, "newRole": role }),
                    &cli_client,
                )
                .await;

            output::print_success(&format!("'{}' is now {}", user.email, user.role));
        }
    }

    stores.close().await;
    Ok(())
}
