//! Alert handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use resqroute_entity::alert::{AlertFilter, AlertStatus, AlertType};
use resqroute_service::alert::{AlertView, NearbyAlert};

use crate::dto::request::{
    AlertListQuery, CreateAlertRequest, NearbyQuery, StatusRequest, UpdateAlertRequest,
};
use crate::dto::response::{AlertNotifiedResponse, AlertResponse, MessageResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser, IdPath, ValidQuery};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// POST /api/alerts
pub async fn create_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<AlertNotifiedResponse>)> {
    let (alert, notifications) = state
        .alert_service
        .create(auth.context(), req.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(AlertNotifiedResponse {
            message: "Alert created and notifications sent successfully".to_string(),
            alert,
            notifications,
        }),
    ))
}

/// GET /api/alerts
pub async fn list_alerts(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidQuery(query): ValidQuery<AlertListQuery>,
) -> ApiResult<Json<Vec<AlertView>>> {
    let filter = AlertFilter {
        status: query
            .status
            .as_deref()
            .map(str::parse::<AlertStatus>)
            .transpose()?,
        alert_type: query
            .alert_type
            .as_deref()
            .map(str::parse::<AlertType>)
            .transpose()?,
    };
    let alerts = state.alert_service.list(&filter).await?;
    Ok(Json(alerts))
}

/// GET /api/alerts/nearby
pub async fn nearby_alerts(
    State(state): State<AppState>,
    _auth: AuthUser,
    ValidQuery(query): ValidQuery<NearbyQuery>,
) -> ApiResult<Json<Vec<NearbyAlert>>> {
    let alerts = state
        .alert_service
        .nearby(query.latitude, query.longitude, query.radius_meters)
        .await?;
    Ok(Json(alerts))
}

/// GET /api/alerts/{id}
pub async fn get_alert(
    State(state): State<AppState>,
    _auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<AlertView>> {
    let alert = state.alert_service.get(id).await?;
    Ok(Json(alert))
}

/// PUT /api/alerts/{id}
pub async fn update_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(req): AppJson<UpdateAlertRequest>,
) -> ApiResult<Json<AlertResponse>> {
    require_admin(&auth)?;
    let alert = state
        .alert_service
        .update(auth.context(), id, req.into())
        .await?;
    Ok(Json(AlertResponse {
        message: "Alert updated successfully".to_string(),
        alert,
    }))
}

/// PUT /api/alerts/{id}/resolve
pub async fn resolve_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<AlertNotifiedResponse>> {
    require_admin(&auth)?;
    let (alert, notifications) = state.alert_service.resolve(auth.context(), id).await?;
    Ok(Json(AlertNotifiedResponse {
        message: "Alert resolved successfully".to_string(),
        alert,
        notifications,
    }))
}

/// PUT /api/alerts/{id}/status
pub async fn set_alert_status(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
    AppJson(req): AppJson<StatusRequest>,
) -> ApiResult<Json<AlertResponse>> {
    require_admin(&auth)?;
    let alert = state
        .alert_service
        .set_status(auth.context(), id, &req.status)
        .await?;
    Ok(Json(AlertResponse {
        message: "Alert status updated successfully".to_string(),
        alert,
    }))
}

/// DELETE /api/alerts/{id}
pub async fn delete_alert(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(id): IdPath,
) -> ApiResult<Json<MessageResponse>> {
    require_admin(&auth)?;
    state.alert_service.delete(auth.context(), id).await?;
    Ok(Json(MessageResponse::new("Alert deleted successfully")))
}
