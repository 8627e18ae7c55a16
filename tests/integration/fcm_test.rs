//! Integration tests for push token registration and test notifications.

use axum::http::StatusCode;
use serde_json::json;

use resqroute_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_register_token() {
    let app = TestApp::new();
    let (_, token) = app.member("Citizen", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/fcm/register",
            Some(json!({ "fcmToken": "device-1" })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["message"], "FCM token registered successfully");
    assert_eq!(response.body["user"]["fcmToken"], "device-1");

    app.register_device(&token, "device-2").await;
    app.register_device(&token, "device-1").await;

    let again = app
        .request(
            "POST",
            "/api/fcm/register",
            Some(json!({ "fcmToken": "device-1" })),
            Some(&token),
        )
        .await;
    assert_eq!(again.body["user"]["fcmToken"], "device-1");
    assert_eq!(again.body["user"]["fcmTokens"], json!(["device-1", "device-2"]));
}

#[tokio::test]
async fn test_register_requires_token() {
    let app = TestApp::new();
    let (_, token) = app.member("Citizen", UserRole::User).await;

    let response = app
        .request(
            "POST",
            "/api/fcm/register",
            Some(json!({ "fcmToken": "   " })),
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "FCM token required");

    let anonymous = app
        .request(
            "POST",
            "/api/fcm/register",
            Some(json!({ "fcmToken": "device-1" })),
            None,
        )
        .await;
    assert_eq!(anonymous.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_send_test_notification() {
    let app = TestApp::new();
    let (user, token) = app.member("Citizen", UserRole::User).await;

    let without_device = app
        .request("POST", "/api/fcm/test", None, Some(&token))
        .await;
    assert_eq!(without_device.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        without_device.body["message"],
        "No FCM token registered. Please log in again to register for notifications."
    );

    app.register_device(&token, "device-1").await;
    let sent = app
        .request("POST", "/api/fcm/test", None, Some(&token))
        .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert_eq!(sent.body["message"], "Test notification sent successfully!");
    assert!(sent.body["messageId"].as_str().is_some());
    assert_eq!(sent.body["user"]["email"], user.email);

    let delivered = app.push.sent_to("device-1").await;
    assert_eq!(delivered.len(), 1);
    assert_eq!(delivered[0].title, "🚨 Test Emergency Alert");
}

#[tokio::test]
async fn test_send_test_reports_provider_failure() {
    let app = TestApp::new();
    let (_, token) = app.member("Citizen", UserRole::User).await;
    app.register_device(&token, "device-1").await;
    app.push.set_fail_all(true);

    let response = app
        .request("POST", "/api/fcm/test", None, Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Failed to send notification");
}
