//! Integration tests for sign-up, login and token handling.

use axum::http::StatusCode;
use serde_json::json;

use resqroute_core::config::AppConfig;
use resqroute_entity::user::UserRole;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_signup_returns_token_and_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "name": "Asha",
                "email": "  Asha@Example.com ",
                "password": PASSWORD,
                "role": "driver"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["message"], "User registered successfully!");
    assert!(response.body["token"].as_str().is_some());
    assert_eq!(response.body["user"]["email"], "asha@example.com");
    assert_eq!(response.body["user"]["role"], "driver");
    assert!(response.body["user"]["userId"].as_str().is_some());
}

#[tokio::test]
async fn test_signup_unknown_role_falls_back_to_user() {
    let app = TestApp::new();

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({
                "name": "Ben",
                "email": "ben@example.com",
                "password": PASSWORD,
                "role": "superhero"
            })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["user"]["role"], "user");
}

#[tokio::test]
async fn test_signup_validation() {
    let app = TestApp::new();

    let missing = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "email": "x@example.com" })),
            None,
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["error"], "VALIDATION_ERROR");

    let short = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "X", "email": "x@example.com", "password": "123" })),
            None,
        )
        .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);
    assert_eq!(short.body["message"], "Password must be at least 6 characters");
}

#[tokio::test]
async fn test_signup_duplicate_email_conflicts() {
    let app = TestApp::new();
    app.create_user("First", "dup@example.com", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/auth/signup",
            Some(json!({ "name": "Second", "email": "DUP@example.com", "password": PASSWORD })),
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_admin_signup_gate() {
    let app = TestApp::new();
    let body = json!({
        "name": "Root",
        "email": "root@example.com",
        "password": PASSWORD,
        "role": "admin"
    });

    let blocked = app
        .request("POST", "/api/auth/signup", Some(body.clone()), None)
        .await;
    assert_eq!(blocked.status, StatusCode::FORBIDDEN);
    assert_eq!(
        blocked.body["message"],
        "Admin accounts cannot be self-registered"
    );

    let mut config = AppConfig::in_memory();
    config.auth.allow_admin_signup = true;
    let open = TestApp::with_config(config);
    let allowed = open.request("POST", "/api/auth/signup", Some(body), None).await;
    assert_eq!(allowed.status, StatusCode::CREATED);
    assert_eq!(allowed.body["user"]["role"], "admin");
}

#[tokio::test]
async fn test_login_success_and_wrong_password() {
    let app = TestApp::new();
    app.create_user("Cara", "cara@example.com", UserRole::User).await;

    let ok = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "cara@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.body["message"], "Login successful");

    let bad = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "cara@example.com", "password": "wrong-password" })),
            None,
        )
        .await;
    assert_eq!(bad.status, StatusCode::UNAUTHORIZED);
    assert_eq!(bad.body["message"], "Invalid credentials");
}

#[tokio::test]
async fn test_scoped_logins() {
    let app = TestApp::new();
    app.create_user("Admin", "admin@example.com", UserRole::Admin).await;
    app.create_user("Dev", "dev@example.com", UserRole::Driver).await;

    let admin_ok = app
        .request(
            "POST",
            "/api/auth/login/admin",
            Some(json!({ "email": "admin@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(admin_ok.status, StatusCode::OK);
    assert_eq!(admin_ok.body["message"], "Admin login successful");

    let driver_as_admin = app
        .request(
            "POST",
            "/api/auth/login/admin",
            Some(json!({ "email": "dev@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(driver_as_admin.status, StatusCode::UNAUTHORIZED);
    assert_eq!(driver_as_admin.body["message"], "Admin account not found");

    let admin_as_user = app
        .request(
            "POST",
            "/api/auth/login/user",
            Some(json!({ "email": "admin@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(admin_as_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(admin_as_user.body["message"], "User account not found");

    let driver_as_user = app
        .request(
            "POST",
            "/api/auth/login/user",
            Some(json!({ "email": "dev@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(driver_as_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(driver_as_user.body["message"], "User account not found");

    let driver_any = app
        .request(
            "POST",
            "/api/auth/login",
            Some(json!({ "email": "dev@example.com", "password": PASSWORD })),
            None,
        )
        .await;
    assert_eq!(driver_any.status, StatusCode::OK);
}

#[tokio::test]
async fn test_me_requires_token() {
    let app = TestApp::new();
    let (user, token) = app.member("Dana", UserRole::User).await;

    let me = app.request("GET", "/api/auth/me", None, Some(&token)).await;
    assert_eq!(me.status, StatusCode::OK);
    assert_eq!(me.body["user"]["userId"], user.id.to_string());
    assert_eq!(me.body["user"]["name"], "Dana");

    let anonymous = app.request("GET", "/api/auth/me", None, None).await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
    assert_eq!(anonymous.body["message"], "No authorization header");

    let garbage = app
        .request("GET", "/api/auth/me", None, Some("not-a-jwt"))
        .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.body["message"], "Invalid token");
}

#[tokio::test]
async fn test_logout_always_succeeds_and_records_activity() {
    let app = TestApp::new();
    let (user, token) = app.member("Eli", UserRole::User).await;

    let anonymous = app.request("POST", "/api/auth/logout", None, None).await;
    assert_eq!(anonymous.status, StatusCode::OK);
    assert_eq!(anonymous.body["message"], "Logged out successfully");

    let signed_in = app
        .request("POST", "/api/auth/logout", None, Some(&token))
        .await;
    assert_eq!(signed_in.status, StatusCode::OK);

    let history = app
        .request(
            "GET",
            &format!("/api/reports/user/{}", user.id),
            None,
            Some(&token),
        )
        .await;
    assert_eq!(history.status, StatusCode::OK);
    let actions: Vec<&str> = history
        .body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|l| l["action"].as_str())
        .collect();
    assert_eq!(actions.iter().filter(|a| **a == "logout").count(), 1);
    assert!(actions.contains(&"login"));
}

#[tokio::test]
async fn test_root_and_health() {
    let app = TestApp::new();

    let root = app.request("GET", "/", None, None).await;
    assert_eq!(root.status, StatusCode::OK);
    assert_eq!(root.body["message"], "ResQroute API Server is running");

    let health = app.request("GET", "/api/health", None, None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.body["status"], "ok");
    assert_eq!(health.body["store"], "memory");
}
