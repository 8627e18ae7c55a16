//! Integration tests for the alert lifecycle and notification fan-out.

use axum::http::StatusCode;
use serde_json::json;

use resqroute_entity::user::UserRole;

use crate::helpers::{TestApp, fire_alert};

#[tokio::test]
async fn test_create_alert_fans_out_to_every_audience() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, driver_token) = app.member("Driver", UserRole::Driver).await;
    let (reporter, reporter_token) = app.member("Reporter", UserRole::User).await;
    app.register_device(&admin_token, "device-admin").await;
    app.register_device(&driver_token, "device-driver").await;
    app.register_device(&reporter_token, "device-reporter").await;

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&reporter_token))
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(
        response.body["message"],
        "Alert created and notifications sent successfully"
    );
    let alert = &response.body["alert"];
    assert_eq!(alert["type"], "fire");
    assert_eq!(alert["priority"], "critical");
    assert_eq!(alert["status"], "active");
    assert_eq!(alert["createdBy"]["email"], reporter.email);
    assert!(alert["resolvedAt"].is_null());

    let stages = response.body["notifications"]["stages"].as_array().unwrap();
    assert_eq!(stages.len(), 3);
    for (stage, audience) in stages.iter().zip(["admins", "drivers", "nearbyUsers"]) {
        assert_eq!(stage["audience"], audience);
        assert_eq!(stage["status"], "sent");
        assert_eq!(stage["successCount"], 1);
    }

    let driver_messages = app.push.sent_to("device-driver").await;
    assert_eq!(driver_messages.len(), 1);
    assert_eq!(driver_messages[0].title, "🚑 EMERGENCY DISPATCH");
}

#[tokio::test]
async fn test_alert_without_coordinates_skips_nearby_users() {
    let app = TestApp::new();
    let (_, token) = app.member("Reporter", UserRole::User).await;
    app.register_device(&token, "device-reporter").await;

    let response = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({
                "type": "medical",
                "message": "Person collapsed",
                "location": "Central Station"
            })),
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert_eq!(response.body["alert"]["priority"], "high");
    assert_eq!(response.body["alert"]["coordinates"]["latitude"], 0.0);

    let stages = response.body["notifications"]["stages"].as_array().unwrap();
    assert_eq!(stages[0]["status"], "skipped");
    assert_eq!(stages[2]["audience"], "nearbyUsers");
    assert_eq!(stages[2]["status"], "skipped");
    assert_eq!(stages[2]["reason"], "Alert has no coordinates");
    assert!(app.push.sent().await.is_empty());
}

#[tokio::test]
async fn test_create_alert_validation() {
    let app = TestApp::new();
    let (_, token) = app.member("Reporter", UserRole::User).await;

    let missing = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "type": "fire", "message": "No location" })),
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Missing type, message, or location");

    let bad_type = app
        .request(
            "POST",
            "/api/alerts",
            Some(json!({ "type": "flood", "message": "Water", "location": "Dock" })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_type.status, StatusCode::BAD_REQUEST);

    let unauthenticated = app
        .request("POST", "/api/alerts", Some(fire_alert()), None)
        .await;
    assert_eq!(unauthenticated.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_and_get_alerts() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, token) = app.member("Reporter", UserRole::User).await;

    let fire = app.create_alert(&token, fire_alert()).await;
    let medical = app
        .create_alert(
            &token,
            json!({ "type": "medical", "message": "Injury", "location": "Park" }),
        )
        .await;
    app.request(
        "PUT",
        &format!("/api/alerts/{}/resolve", medical),
        None,
        Some(&admin_token),
    )
    .await;

    let all = app.request("GET", "/api/alerts", None, Some(&token)).await;
    assert_eq!(all.status, StatusCode::OK);
    assert_eq!(all.body.as_array().unwrap().len(), 2);

    let active = app
        .request("GET", "/api/alerts?status=active", None, Some(&token))
        .await;
    let active = active.body.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["id"], fire);

    let by_type = app
        .request("GET", "/api/alerts?type=medical", None, Some(&token))
        .await;
    assert_eq!(by_type.body.as_array().unwrap().len(), 1);

    let bad_filter = app
        .request("GET", "/api/alerts?status=sleeping", None, Some(&token))
        .await;
    assert_eq!(bad_filter.status, StatusCode::BAD_REQUEST);

    let one = app
        .request("GET", &format!("/api/alerts/{}", fire), None, Some(&token))
        .await;
    assert_eq!(one.status, StatusCode::OK);
    assert_eq!(one.body["location"], "12 Harbor Road");

    let malformed = app
        .request("GET", "/api/alerts/not-a-uuid", None, Some(&token))
        .await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);

    let missing = app
        .request(
            "GET",
            "/api/alerts/00000000-0000-0000-0000-000000000000",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resolve_is_admin_only_and_keeps_first_timestamp() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, token) = app.member("Reporter", UserRole::User).await;
    app.register_device(&token, "device-reporter").await;
    let id = app.create_alert(&token, fire_alert()).await;
    let path = format!("/api/alerts/{}/resolve", id);

    let forbidden = app.request("PUT", &path, None, Some(&token)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);
    assert_eq!(forbidden.body["message"], "Access denied. Admin only.");

    let first = app.request("PUT", &path, None, Some(&admin_token)).await;
    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(first.body["message"], "Alert resolved successfully");
    assert_eq!(first.body["alert"]["status"], "resolved");
    let resolved_at = first.body["alert"]["resolvedAt"].clone();
    assert!(resolved_at.is_string());
    assert_eq!(first.body["notifications"]["stages"][0]["audience"], "allUsers");

    let resolution = app.push.sent_to("device-reporter").await;
    assert_eq!(resolution.last().unwrap().title, "✅ ALERT RESOLVED");

    let second = app.request("PUT", &path, None, Some(&admin_token)).await;
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(second.body["alert"]["resolvedAt"], resolved_at);
}

#[tokio::test]
async fn test_status_changes() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let id = app.create_alert(&admin_token, fire_alert()).await;
    let path = format!("/api/alerts/{}/status", id);

    let resolved = app
        .request("PUT", &path, Some(json!({ "status": "resolved" })), Some(&admin_token))
        .await;
    assert_eq!(resolved.status, StatusCode::OK);
    assert_eq!(resolved.body["message"], "Alert status updated successfully");
    assert!(resolved.body["alert"]["resolvedAt"].is_string());

    let cancelled = app
        .request("PUT", &path, Some(json!({ "status": "cancelled" })), Some(&admin_token))
        .await;
    assert_eq!(cancelled.body["alert"]["status"], "cancelled");
    assert!(cancelled.body["alert"]["resolvedAt"].is_string());

    let reopened = app
        .request("PUT", &path, Some(json!({ "status": "active" })), Some(&admin_token))
        .await;
    assert_eq!(reopened.body["alert"]["status"], "active");
    assert!(reopened.body["alert"]["resolvedAt"].is_null());

    let invalid = app
        .request("PUT", &path, Some(json!({ "status": "paused" })), Some(&admin_token))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(invalid.body["message"], "Invalid status");
}

#[tokio::test]
async fn test_update_alert() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let id = app.create_alert(&admin_token, fire_alert()).await;
    let path = format!("/api/alerts/{}", id);

    let updated = app
        .request(
            "PUT",
            &path,
            Some(json!({ "priority": "low", "message": "Contained" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(updated.status, StatusCode::OK);
    assert_eq!(updated.body["alert"]["priority"], "low");
    assert_eq!(updated.body["alert"]["message"], "Contained");
    assert_eq!(updated.body["alert"]["location"], "12 Harbor Road");

    let half_coordinates = app
        .request(
            "PUT",
            &path,
            Some(json!({ "coordinates": { "latitude": 10.0 } })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(half_coordinates.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        half_coordinates.body["message"],
        "latitude and longitude must be given together"
    );

    let empty = app
        .request("PUT", &path, Some(json!({})), Some(&admin_token))
        .await;
    assert_eq!(empty.status, StatusCode::BAD_REQUEST);
    assert_eq!(empty.body["message"], "No fields to update");
}

#[tokio::test]
async fn test_delete_alert() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, token) = app.member("Reporter", UserRole::User).await;
    let id = app.create_alert(&token, fire_alert()).await;
    let path = format!("/api/alerts/{}", id);

    let forbidden = app.request("DELETE", &path, None, Some(&token)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let deleted = app.request("DELETE", &path, None, Some(&admin_token)).await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "Alert deleted successfully");

    let gone = app.request("DELETE", &path, None, Some(&admin_token)).await;
    assert_eq!(gone.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_nearby_alerts() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, token) = app.member("Reporter", UserRole::User).await;
    let near = app.create_alert(&token, fire_alert()).await;
    let resolved = app.create_alert(&token, fire_alert()).await;
    app.request(
        "PUT",
        &format!("/api/alerts/{}/resolve", resolved),
        None,
        Some(&admin_token),
    )
    .await;

    // About 1.1 km north of the alerts.
    let found = app
        .request(
            "GET",
            "/api/alerts/nearby?latitude=28.6239&longitude=77.209",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(found.status, StatusCode::OK);
    let found = found.body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], near);
    let distance = found[0]["distanceMeters"].as_f64().unwrap();
    assert!((1000.0..1200.0).contains(&distance), "distance {distance}");

    let tight = app
        .request(
            "GET",
            "/api/alerts/nearby?latitude=28.6239&longitude=77.209&radiusMeters=500",
            None,
            Some(&token),
        )
        .await;
    assert!(tight.body.as_array().unwrap().is_empty());

    let out_of_range = app
        .request(
            "GET",
            "/api/alerts/nearby?latitude=95&longitude=0",
            None,
            Some(&token),
        )
        .await;
    assert_eq!(out_of_range.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_deleted_account_cannot_raise_alert() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (reporter, reporter_token) = app.member("Reporter", UserRole::User).await;

    let deleted = app
        .request(
            "DELETE",
            &format!("/api/users/{}", reporter.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(deleted.status, StatusCode::OK);

    let response = app
        .request("POST", "/api/alerts", Some(fire_alert()), Some(&reporter_token))
        .await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "User not found");

    let alerts = app
        .request("GET", "/api/alerts", None, Some(&admin_token))
        .await;
    assert!(alerts.body.as_array().unwrap().is_empty());
}
