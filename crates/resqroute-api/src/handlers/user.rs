//! User administration handlers.

use axum::Json;
use axum::extract::State;

use resqroute_entity::user::User;
use resqroute_service::user::UserStats;

use crate::dto::request::{ProfileRequest, RoleRequest};
use crate::dto::response::{MessageResponse, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser, IdPath};
use crate::middleware::rbac::{require_admin, require_self_or_admin};
use crate::state::AppState;

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<Vec<User>>> {
    require_admin(&auth)?;
    Ok(Json(state.user_service.list().await?))
}

/// GET /api/users/stats/overview
pub async fn user_stats(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<UserStats>> {
    require_admin(&auth)?;
    Ok(Json(state.user_service.stats().await?))
}

/// GET /api/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<User>> {
    require_admin(&auth)?;
    Ok(Json(state.user_service.get(id).await?))
}

/// PUT /api/users/{id}/role
pub async fn change_role(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(req): AppJson<RoleRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_admin(&auth)?;
    let user = state
        .user_service
        .change_role(auth.context(), id, &req.role)
        .await?;
    Ok(Json(UserResponse {
        message: "User role updated successfully".to_string(),
        user,
    }))
}

/// PUT /api/users/{id}/profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(req): AppJson<ProfileRequest>,
) -> ApiResult<Json<UserResponse>> {
    require_self_or_admin(&auth, id)?;
    let user = state
        .user_service
        .update_profile(auth.context(), id, req.into())
        .await?;
    Ok(Json(UserResponse {
        message: "Profile updated successfully".to_string(),
        user,
    }))
}

/// DELETE /api/users/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    require_admin(&auth)?;
    state.user_service.delete(auth.context(), id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
