//! User management: listing, role changes, deletion, profile edits.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use resqroute_core::error::AppError;
use resqroute_database::UserStore;
use resqroute_entity::activity::action;
use resqroute_entity::user::{UpdateProfile, User, UserRole};

use crate::activity::ActivityLogger;
use crate::auth::normalize_email;
use crate::context::RequestContext;

/// Newest accounts shown in the stats view.
pub const RECENT_USERS_LIMIT: usize = 5;

/// Profile edit input. Blank values are ignored.
#[derive(Debug, Clone, Default)]
pub struct ProfileInput {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// User counts for the admin overview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserStats {
    pub total: i64,
    pub admins: i64,
    pub drivers: i64,
    pub users: i64,
    /// Newest accounts.
    pub recent: Vec<User>,
}

/// Account administration.
#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<dyn UserStore>,
    logger: ActivityLogger,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(users: Arc<dyn UserStore>, logger: ActivityLogger) -> Self {
        Self { users, logger }
    }

    /// All users, newest first.
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        self.users.list(None).await
    }

    /// Get a user by ID.
    pub async fn get(&self, id: Uuid) -> Result<User, AppError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Change a user's role.
    pub async fn change_role(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        role: &str,
    ) -> Result<User, AppError> {
        let role: UserRole = role.parse().map_err(|_| {
            AppError::validation("Invalid role. Must be one of: user, admin, driver")
        })?;

        let before = self.get(id).await?;
        let updated = self
            .users
            .update_role(id, role)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        self.logger
            .record(
                Some(ctx.user_id),
                action::ROLE_CHANGED,
                format!("Changed {}'s role to {}", updated.name, role),
                json!({
                    "targetUserId": updated.id,
                    "targetUserEmail": updated.email,
                    "oldRole": before.role,
                    "newRole": role,
                }),
                &ctx.client,
            )
            .await;

        info!(
            user_id = %ctx.user_id,
            target = %id,
            old_role = %before.role,
            new_role = %role,
            "User role changed"
        );
        Ok(updated)
    }

    /// Delete another user's account.
    pub async fn delete(&self, ctx: &RequestContext, id: Uuid) -> Result<User, AppError> {
        if ctx.user_id == id {
            return Err(AppError::validation("Cannot delete your own account"));
        }

        let user = self.get(id).await?;
        if !self.users.delete(id).await? {
            return Err(AppError::not_found("User not found"));
        }

        self.logger
            .record(
                Some(ctx.user_id),
                action::USER_DELETED,
                format!("Deleted user: {} ({})", user.name, user.email),
                json!({
                    "deletedUserId": user.id,
                    "deletedUserEmail": user.email,
                    "deletedUserRole": user.role,
                }),
                &ctx.client,
            )
            .await;

        info!(user_id = %ctx.user_id, target = %id, "User deleted");
        Ok(user)
    }

    /// Update name and/or email. Users may edit themselves; admins anyone.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        id: Uuid,
        input: ProfileInput,
    ) -> Result<User, AppError> {
        if !ctx.is_self_or_admin(id) {
            return Err(AppError::authorization("Access denied"));
        }

        let update = UpdateProfile {
            name: input
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty()),
            email: input
                .email
                .map(|e| normalize_email(&e))
                .filter(|e| !e.is_empty()),
        };

        let user = if update.is_empty() {
            self.get(id).await?
        } else {
            self.users
                .update_profile(id, &update)
                .await?
                .ok_or_else(|| AppError::not_found("User not found"))?
        };

        self.logger
            .record(
                Some(ctx.user_id),
                action::PROFILE_UPDATED,
                format!("Updated profile for {}", user.name),
                json!({
                    "targetUserId": user.id,
                    "updatedFields": update.changed_fields(),
                }),
                &ctx.client,
            )
            .await;

        Ok(user)
    }

    /// Counts per role plus the newest accounts.
    pub async fn stats(&self) -> Result<UserStats, AppError> {
        let counts = self.users.count_by_role().await?;
        let recent = self.users.list(Some(RECENT_USERS_LIMIT)).await?;
        Ok(UserStats {
            total: counts.total,
            admins: counts.admins,
            drivers: counts.drivers,
            users: counts.users,
            recent,
        })
    }
}
