//! Auth handlers: signup, the three login flavors, logout, me.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use resqroute_service::auth::{AuthSession, LoginScope};

use crate::dto::request::{LoginRequest, SignupRequest};
use crate::dto::response::{AuthResponse, MeResponse, MessageResponse, SessionUser};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser, ClientMeta, MaybeAuthUser};
use crate::state::AppState;

fn session_response(message: &str, session: AuthSession) -> AuthResponse {
    AuthResponse {
        message: message.to_string(),
        user: SessionUser::from(&session.user),
        token: session.token,
        expires_at: session.expires_at,
    }
}

/// POST /api/auth/signup
pub async fn signup(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    AppJson(req): AppJson<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let session = state.auth_service.signup(req.into(), &client).await?;
    Ok((
        StatusCode::CREATED,
        Json(session_response("User registered successfully!", session)),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state
        .auth_service
        .login(req.into(), LoginScope::Any, &client)
        .await?;
    Ok(Json(session_response("Login successful", session)))
}

/// POST /api/auth/login/user
pub async fn login_user(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state
        .auth_service
        .login(req.into(), LoginScope::User, &client)
        .await?;
    Ok(Json(session_response("Login successful", session)))
}

/// POST /api/auth/login/admin
pub async fn login_admin(
    State(state): State<AppState>,
    ClientMeta(client): ClientMeta,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let session = state
        .auth_service
        .login(req.into(), LoginScope::Admin, &client)
        .await?;
    Ok(Json(session_response("Admin login successful", session)))
}

/// POST /api/auth/logout
///
/// Always succeeds; the audit entry is only written for a valid token.
pub async fn logout(
    State(state): State<AppState>,
    MaybeAuthUser(auth): MaybeAuthUser,
    ClientMeta(client): ClientMeta,
) -> Json<MessageResponse> {
    state
        .auth_service
        .logout(auth.as_ref().map(|a| &a.claims), &client)
        .await;
    Json(MessageResponse::new("Logged out successfully"))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Json<MeResponse>> {
    let user = state.auth_service.me(auth.context()).await?;
    Ok(Json(MeResponse {
        user: SessionUser::from(&user),
    }))
}
