//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use resqroute_core::config::AppConfig;
use resqroute_database::Stores;
use resqroute_push::PushManager;
use resqroute_service::{
    ActivityLogger, ActivityService, AlertService, AuthService, NotificationFanout,
    NotificationService, UserService,
};

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// Store set (PostgreSQL or in-memory)
    pub stores: Stores,
    /// Push provider manager
    pub push: PushManager,

    // ── Services ─────────────────────────────────────────────
    /// Sign-up, login, token verification
    pub auth_service: Arc<AuthService>,
    /// User administration
    pub user_service: Arc<UserService>,
    /// Alert lifecycle and fan-out
    pub alert_service: Arc<AlertService>,
    /// Activity log and dashboard
    pub activity_service: Arc<ActivityService>,
    /// Push token registration and test sends
    pub notification_service: Arc<NotificationService>,
}

impl AppState {
    /// Wire every service from the stores and push manager.
    pub fn new(config: AppConfig, stores: Stores, push: PushManager) -> Self {
        let logger = ActivityLogger::new(stores.activity.clone());

        let auth_service = Arc::new(AuthService::new(
            stores.users.clone(),
            logger.clone(),
            &config.auth,
        ));
        let user_service = Arc::new(UserService::new(stores.users.clone(), logger.clone()));
        let fanout = NotificationFanout::new(
            stores.users.clone(),
            push.clone(),
            config.push.nearby_user_limit,
        );
        let alert_service = Arc::new(AlertService::new(
            stores.alerts.clone(),
            stores.users.clone(),
            fanout,
            logger.clone(),
        ));
        let activity_service = Arc::new(ActivityService::new(
            stores.activity.clone(),
            stores.users.clone(),
            stores.alerts.clone(),
            logger.clone(),
        ));
        let notification_service = Arc::new(NotificationService::new(
            stores.users.clone(),
            push.clone(),
            logger,
        ));

        Self {
            config: Arc::new(config),
            stores,
            push,
            auth_service,
            user_service,
            alert_service,
            activity_service,
            notification_service,
        }
    }
}
