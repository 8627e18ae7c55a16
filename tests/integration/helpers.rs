//! Shared test helpers for integration tests.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use resqroute_api::{AppState, build_app};
use resqroute_core::config::AppConfig;
use resqroute_database::Stores;
use resqroute_entity::user::{User, UserRole};
use resqroute_push::{MemoryPushProvider, PushManager};

/// Default password for accounts created by the helpers.
pub const PASSWORD: &str = "secret123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// Shared state, for seeding data behind the API
    pub state: AppState,
    /// Recorded push notifications
    pub push: MemoryPushProvider,
}

impl TestApp {
    /// Create a new test application with empty stores
    pub fn new() -> Self {
        Self::with_config(AppConfig::in_memory())
    }

    /// Create a test application from a custom config
    pub fn with_config(config: AppConfig) -> Self {
        let push = MemoryPushProvider::new();
        let manager = PushManager::from_provider(
            Arc::new(push.clone()),
            config.push.multicast_concurrency,
        );
        let state = AppState::new(config, Stores::in_memory(), manager);
        let router = build_app(state.clone());
        Self {
            router,
            state,
            push,
        }
    }

    /// Create an account directly through the auth service
    pub async fn create_user(&self, name: &str, email: &str, role: UserRole) -> User {
        self.state
            .auth_service
            .create_account(name, email, PASSWORD, role)
            .await
            .expect("Failed to create test user")
    }

    /// Login and return the JWT
    pub async fn login(&self, email: &str) -> String {
        let response = self
            .request(
                "POST",
                "/api/auth/login",
                Some(json!({ "email": email, "password": PASSWORD })),
                None,
            )
            .await;

        assert_eq!(
            response.status,
            StatusCode::OK,
            "Login failed: {:?}",
            response.body
        );

        response.body["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }

    /// Create an admin and return it with a token
    pub async fn admin(&self) -> (User, String) {
        let user = self
            .create_user("Admin", "admin@resq.test", UserRole::Admin)
            .await;
        let token = self.login(&user.email).await;
        (user, token)
    }

    /// Create a user with the given role and return it with a token
    pub async fn member(&self, name: &str, role: UserRole) -> (User, String) {
        let email = format!("{}@resq.test", name.to_lowercase());
        let user = self.create_user(name, &email, role).await;
        let token = self.login(&user.email).await;
        (user, token)
    }

    /// Register a push token for the holder of `token`
    pub async fn register_device(&self, token: &str, device: &str) {
        let response = self
            .request(
                "POST",
                "/api/fcm/register",
                Some(json!({ "fcmToken": device })),
                Some(token),
            )
            .await;
        assert_eq!(response.status, StatusCode::OK, "{:?}", response.body);
    }

    /// Create an alert and return its id
    pub async fn create_alert(&self, token: &str, body: Value) -> String {
        let response = self.request("POST", "/api/alerts", Some(body), Some(token)).await;
        assert_eq!(
            response.status,
            StatusCode::CREATED,
            "Alert creation failed: {:?}",
            response.body
        );
        response.body["alert"]["id"]
            .as_str()
            .expect("No alert id")
            .to_string()
    }

    /// Send a request through the router
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> TestResponse {
        let body_str = body
            .map(|b| serde_json::to_string(&b).expect("Failed to serialize body"))
            .unwrap_or_default();

        let mut req = Request::builder()
            .method(method)
            .uri(path)
            .header("Content-Type", "application/json")
            .header("User-Agent", "resqroute-tests");

        if let Some(token) = token {
            req = req.header("Authorization", format!("Bearer {}", token));
        }

        let req = req
            .body(Body::from(body_str))
            .expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        let body: Value = serde_json::from_slice(&body_bytes).unwrap_or(Value::Null);

        TestResponse { status, body }
    }
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Parsed JSON body
    pub body: Value,
}

/// A standard alert body with coordinates
pub fn fire_alert() -> Value {
    json!({
        "type": "fire",
        "message": "Smoke from the third floor",
        "location": "12 Harbor Road",
        "coordinates": { "latitude": 28.6139, "longitude": 77.209 },
        "priority": "critical"
    })
}
