//! Push token handlers.

use axum::Json;
use axum::extract::State;

use crate::dto::request::RegisterTokenRequest;
use crate::dto::response::{TestNotificationResponse, TestRecipient, UserResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser};
use crate::state::AppState;

/// POST /api/fcm/register
pub async fn register_token(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<RegisterTokenRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .notification_service
        .register_token(auth.context(), &req.fcm_token)
        .await?;
    Ok(Json(UserResponse {
        message: "FCM token registered successfully".to_string(),
        user,
    }))
}

/// POST /api/fcm/test
pub async fn send_test(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<TestNotificationResponse>> {
    let delivery = state.notification_service.send_test(auth.context()).await?;
    Ok(Json(TestNotificationResponse {
        message: "Test notification sent successfully!".to_string(),
        message_id: delivery.message_id,
        user: TestRecipient {
            email: delivery.user.email,
            name: delivery.user.name,
        },
    }))
}
