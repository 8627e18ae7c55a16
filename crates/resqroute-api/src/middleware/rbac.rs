//! Role guards for handlers.

use uuid::Uuid;

use resqroute_core::error::AppError;

use crate::extractors::AuthUser;

/// Checks that the authenticated user has the Admin role.
pub fn require_admin(auth: &AuthUser) -> Result<(), AppError> {
    if !auth.is_admin() {
        return Err(AppError::authorization("Access denied. Admin only."));
    }
    Ok(())
}

/// Checks that the caller is the target user or an admin.
pub fn require_self_or_admin(auth: &AuthUser, user_id: Uuid) -> Result<(), AppError> {
    if !auth.is_self_or_admin(user_id) {
        return Err(AppError::authorization("Access denied"));
    }
    Ok(())
}
