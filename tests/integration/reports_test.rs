//! Integration tests for the activity log and dashboard.

use axum::http::StatusCode;
use serde_json::json;

use resqroute_entity::user::UserRole;

use crate::helpers::{TestApp, fire_alert};

#[tokio::test]
async fn test_alert_actions_are_logged() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (reporter, reporter_token) = app.member("Reporter", UserRole::User).await;
    let id = app.create_alert(&reporter_token, fire_alert()).await;
    app.request(
        "PUT",
        &format!("/api/alerts/{}/resolve", id),
        None,
        Some(&admin_token),
    )
    .await;

    let created = app
        .request("GET", "/api/reports?action=alert_created", None, Some(&admin_token))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(created.body["pagination"]["totalLogs"], 1);
    let entry = &created.body["logs"][0];
    assert_eq!(entry["userId"], reporter.id.to_string());
    assert_eq!(entry["user"]["email"], reporter.email);
    assert_eq!(entry["metadata"]["alertId"], id);

    let resolved = app
        .request("GET", "/api/reports?action=alert_resolved", None, Some(&admin_token))
        .await;
    assert_eq!(resolved.body["pagination"]["totalLogs"], 1);
}

#[tokio::test]
async fn test_list_paginates_newest_first() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    for n in 0..5 {
        let response = app
            .request(
                "POST",
                "/api/reports",
                Some(json!({ "action": "drill", "description": format!("Drill {n}") })),
                Some(&admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let page = app
        .request(
            "GET",
            "/api/reports?action=drill&limit=2&page=2",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    assert_eq!(page.body["pagination"]["current"], 2);
    assert_eq!(page.body["pagination"]["total"], 3);
    assert_eq!(page.body["pagination"]["count"], 2);
    assert_eq!(page.body["pagination"]["totalLogs"], 5);
    assert_eq!(page.body["logs"].as_array().unwrap().len(), 2);

    let bad_page = app
        .request("GET", "/api/reports?page=0", None, Some(&admin_token))
        .await;
    assert_eq!(bad_page.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_page.body["message"], "page must be at least 1");
}

#[tokio::test]
async fn test_list_is_admin_only() {
    let app = TestApp::new();
    let (_, token) = app.member("Citizen", UserRole::User).await;

    let response = app.request("GET", "/api/reports", None, Some(&token)).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let dashboard = app
        .request("GET", "/api/reports/stats/dashboard", None, Some(&token))
        .await;
    assert_eq!(dashboard.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_user_history_is_self_or_admin() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (citizen, citizen_token) = app.member("Citizen", UserRole::User).await;
    let (other, _) = app.member("Other", UserRole::User).await;

    let own = app
        .request(
            "GET",
            &format!("/api/reports/user/{}", citizen.id),
            None,
            Some(&citizen_token),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    let own = own.body.as_array().unwrap();
    assert!(own.iter().any(|l| l["action"] == "login"));
    assert!(own.iter().all(|l| l["userId"] == citizen.id.to_string()));

    let foreign = app
        .request(
            "GET",
            &format!("/api/reports/user/{}", other.id),
            None,
            Some(&citizen_token),
        )
        .await;
    assert_eq!(foreign.status, StatusCode::FORBIDDEN);
    assert_eq!(foreign.body["message"], "Access denied");

    let by_admin = app
        .request(
            "GET",
            &format!("/api/reports/user/{}", other.id),
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
}

#[tokio::test]
async fn test_create_log_validation() {
    let app = TestApp::new();
    let (citizen, token) = app.member("Citizen", UserRole::User).await;

    let created = app
        .request(
            "POST",
            "/api/reports",
            Some(json!({
                "action": "route_cleared",
                "description": "Moved aside for ambulance",
                "metadata": { "street": "Harbor Road" }
            })),
            Some(&token),
        )
        .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["message"], "Log created");
    assert_eq!(created.body["log"]["userId"], citizen.id.to_string());
    assert_eq!(created.body["log"]["metadata"]["street"], "Harbor Road");

    let missing = app
        .request(
            "POST",
            "/api/reports",
            Some(json!({ "action": "route_cleared" })),
            Some(&token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::BAD_REQUEST);
    assert_eq!(missing.body["message"], "Action and description are required");

    let bad_metadata = app
        .request(
            "POST",
            "/api/reports",
            Some(json!({ "action": "a", "description": "b", "metadata": [1, 2] })),
            Some(&token),
        )
        .await;
    assert_eq!(bad_metadata.status, StatusCode::BAD_REQUEST);
    assert_eq!(bad_metadata.body["message"], "metadata must be a JSON object");
}

#[tokio::test]
async fn test_dashboard() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (_, token) = app.member("Citizen", UserRole::User).await;
    let first = app.create_alert(&token, fire_alert()).await;
    app.create_alert(&token, fire_alert()).await;
    app.request(
        "PUT",
        &format!("/api/alerts/{}/resolve", first),
        None,
        Some(&admin_token),
    )
    .await;

    let response = app
        .request("GET", "/api/reports/stats/dashboard", None, Some(&admin_token))
        .await;
    assert_eq!(response.status, StatusCode::OK);
    let body = &response.body;
    assert_eq!(body["users"]["total"], 2);
    assert_eq!(body["users"]["active"], 2);
    assert_eq!(body["alerts"]["total"], 2);
    assert_eq!(body["alerts"]["active"], 1);
    assert_eq!(body["alerts"]["resolved"], 1);
    assert!(body["activities"]["today"].as_i64().unwrap() >= 5);
    let recent = body["activities"]["recent"].as_array().unwrap();
    assert!(!recent.is_empty() && recent.len() <= 10);
}

#[tokio::test]
async fn test_cleanup() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;

    let kept = app
        .request("DELETE", "/api/reports/cleanup", None, Some(&admin_token))
        .await;
    assert_eq!(kept.status, StatusCode::OK);
    assert_eq!(kept.body["deletedCount"], 0);
    assert_eq!(kept.body["message"], "Deleted 0 logs older than 30 days");

    let negative = app
        .request("DELETE", "/api/reports/cleanup?days=-1", None, Some(&admin_token))
        .await;
    assert_eq!(negative.status, StatusCode::BAD_REQUEST);
    assert_eq!(negative.body["message"], "days must not be negative");
}

#[tokio::test]
async fn test_cleanup_rejects_days_beyond_calendar() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;

    for days in ["100000000", "100000000000000"] {
        let response = app
            .request(
                "DELETE",
                &format!("/api/reports/cleanup?days={days}"),
                None,
                Some(&admin_token),
            )
            .await;
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        assert_eq!(response.body["message"], "days is out of range");
    }
}

#[tokio::test]
async fn test_page_past_the_end_is_empty() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;

    let response = app
        .request(
            "GET",
            "/api/reports?page=18446744073709551615&limit=500",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["pagination"]["current"], u64::MAX);
    assert_eq!(response.body["pagination"]["count"], 0);
    assert!(response.body["logs"].as_array().unwrap().is_empty());
}
