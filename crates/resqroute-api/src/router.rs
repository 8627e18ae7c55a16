//! Route definitions for the ResQroute HTTP API.
//!
//! Domain routes are mounted under `/api`; `/` answers a liveness probe.

use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::handlers;
use crate::state::AppState;

/// Build the API router with every route, threading `AppState` through
/// `.with_state(state)`.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(auth_routes())
        .merge(alert_routes())
        .merge(user_routes())
        .merge(report_routes())
        .merge(fcm_routes())
        .route("/health", get(handlers::health::health));

    Router::new()
        .route("/", get(handlers::health::root))
        .nest("/api", api_routes)
        .with_state(state)
}

/// Auth endpoints: signup, login flavors, logout, me
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/signup", post(handlers::auth::signup))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/login/user", post(handlers::auth::login_user))
        .route("/auth/login/admin", post(handlers::auth::login_admin))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/me", get(handlers::auth::me))
}

/// Alert lifecycle
fn alert_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/alerts",
            get(handlers::alert::list_alerts).post(handlers::alert::create_alert),
        )
        .route("/alerts/nearby", get(handlers::alert::nearby_alerts))
        .route(
            "/alerts/{id}",
            get(handlers::alert::get_alert)
                .put(handlers::alert::update_alert)
                .delete(handlers::alert::delete_alert),
        )
        .route("/alerts/{id}/resolve", put(handlers::alert::resolve_alert))
        .route("/alerts/{id}/status", put(handlers::alert::set_alert_status))
}

/// User administration
fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/stats/overview", get(handlers::user::user_stats))
        .route(
            "/users/{id}",
            get(handlers::user::get_user).delete(handlers::user::delete_user),
        )
        .route("/users/{id}/role", put(handlers::user::change_role))
        .route("/users/{id}/profile", put(handlers::user::update_profile))
}

/// Activity log and dashboard
fn report_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/reports",
            get(handlers::report::list_logs).post(handlers::report::create_log),
        )
        .route("/reports/user/{user_id}", get(handlers::report::user_logs))
        .route("/reports/stats/dashboard", get(handlers::report::dashboard))
        .route("/reports/cleanup", delete(handlers::report::cleanup))
}

/// Push token registration
fn fcm_routes() -> Router<AppState> {
    Router::new()
        .route("/fcm/register", post(handlers::fcm::register_token))
        .route("/fcm/test", post(handlers::fcm::send_test))
}
