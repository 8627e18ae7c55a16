//! Activity report handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::Utc;

use resqroute_core::types::pagination::PageRequest;
use resqroute_entity::activity::{ActivityFilter, ActivityLog};
use resqroute_service::activity::{ActivityPage, DashboardStats};

use crate::dto::request::{CleanupQuery, CreateLogRequest, ReportQuery};
use crate::dto::response::{CleanupResponse, LogResponse};
use crate::error::ApiResult;
use crate::extractors::{AppJson, AuthUser, IdPath, ValidQuery};
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// GET /api/reports
pub async fn list_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<ReportQuery>,
) -> ApiResult<Json<ActivityPage>> {
    require_admin(&auth)?;
    let filter = ActivityFilter {
        user_id: query.user_id,
        action: query.action.filter(|a| !a.trim().is_empty()),
    };
    let page = state
        .activity_service
        .list(&filter, PageRequest::new(query.page, query.limit))
        .await?;
    Ok(Json(page))
}

/// GET /api/reports/user/{user_id}
pub async fn user_logs(
    State(state): State<AppState>,
    auth: AuthUser,
    IdPath(user_id): IdPath,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let logs = state
        .activity_service
        .list_for_user(auth.context(), user_id)
        .await?;
    Ok(Json(logs))
}

/// POST /api/reports
pub async fn create_log(
    State(state): State<AppState>,
    auth: AuthUser,
    AppJson(req): AppJson<CreateLogRequest>,
) -> ApiResult<(StatusCode, Json<LogResponse>)> {
    let log = state
        .activity_service
        .create(auth.context(), &req.action, &req.description, req.metadata)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(LogResponse {
            message: "Log created".to_string(),
            log,
        }),
    ))
}

/// GET /api/reports/stats/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
) -> ApiResult<Json<DashboardStats>> {
    require_admin(&auth)?;
    Ok(Json(state.activity_service.dashboard(Utc::now()).await?))
}

/// DELETE /api/reports/cleanup
pub async fn cleanup(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidQuery(query): ValidQuery<CleanupQuery>,
) -> ApiResult<Json<CleanupResponse>> {
    require_admin(&auth)?;
    let report = state.activity_service.cleanup(query.days).await?;
    Ok(Json(CleanupResponse {
        message: format!(
            "Deleted {} logs older than {} days",
            report.deleted_count, report.days
        ),
        deleted_count: report.deleted_count,
    }))
}
