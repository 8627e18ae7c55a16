//! Integration tests for user administration.

use axum::http::StatusCode;
use serde_json::json;

use resqroute_entity::user::UserRole;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_user_admin_routes_require_admin() {
    let app = TestApp::new();
    let (other, _) = app.member("Other", UserRole::User).await;
    let (_, driver_token) = app.member("Driver", UserRole::Driver).await;

    for (method, path) in [
        ("GET", "/api/users".to_string()),
        ("GET", "/api/users/stats/overview".to_string()),
        ("GET", format!("/api/users/{}", other.id)),
        ("DELETE", format!("/api/users/{}", other.id)),
    ] {
        let response = app.request(method, &path, None, Some(&driver_token)).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "{method} {path}");
        assert_eq!(response.body["message"], "Access denied. Admin only.");
    }
}

#[tokio::test]
async fn test_list_and_stats() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    app.member("Driver", UserRole::Driver).await;
    app.member("Citizen", UserRole::User).await;

    let list = app.request("GET", "/api/users", None, Some(&admin_token)).await;
    assert_eq!(list.status, StatusCode::OK);
    let users = list.body.as_array().unwrap();
    assert_eq!(users.len(), 3);
    assert!(users.iter().all(|u| u.get("passwordHash").is_none()));

    let stats = app
        .request("GET", "/api/users/stats/overview", None, Some(&admin_token))
        .await;
    assert_eq!(stats.status, StatusCode::OK);
    assert_eq!(stats.body["total"], 3);
    assert_eq!(stats.body["admins"], 1);
    assert_eq!(stats.body["drivers"], 1);
    assert_eq!(stats.body["users"], 1);
}

#[tokio::test]
async fn test_get_user() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (citizen, _) = app.member("Citizen", UserRole::User).await;

    let found = app
        .request("GET", &format!("/api/users/{}", citizen.id), None, Some(&admin_token))
        .await;
    assert_eq!(found.status, StatusCode::OK);
    assert_eq!(found.body["email"], "citizen@resq.test");
    assert!(found.body["lastLoginAt"].is_string());

    let missing = app
        .request(
            "GET",
            "/api/users/00000000-0000-0000-0000-000000000000",
            None,
            Some(&admin_token),
        )
        .await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
    assert_eq!(missing.body["message"], "User not found");
}

#[tokio::test]
async fn test_change_role() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (citizen, citizen_token) = app.member("Citizen", UserRole::User).await;
    let path = format!("/api/users/{}/role", citizen.id);

    let by_citizen = app
        .request("PUT", &path, Some(json!({ "role": "admin" })), Some(&citizen_token))
        .await;
    assert_eq!(by_citizen.status, StatusCode::FORBIDDEN);

    let invalid = app
        .request("PUT", &path, Some(json!({ "role": "captain" })), Some(&admin_token))
        .await;
    assert_eq!(invalid.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        invalid.body["message"],
        "Invalid role. Must be one of: user, admin, driver"
    );

    let changed = app
        .request("PUT", &path, Some(json!({ "role": "driver" })), Some(&admin_token))
        .await;
    assert_eq!(changed.status, StatusCode::OK);
    assert_eq!(changed.body["message"], "User role updated successfully");
    assert_eq!(changed.body["user"]["role"], "driver");

    let logs = app
        .request("GET", "/api/reports?action=role_changed", None, Some(&admin_token))
        .await;
    let entry = &logs.body["logs"][0];
    assert_eq!(entry["metadata"]["oldRole"], "user");
    assert_eq!(entry["metadata"]["newRole"], "driver");
}

#[tokio::test]
async fn test_update_profile_self_or_admin() {
    let app = TestApp::new();
    let (_, admin_token) = app.admin().await;
    let (citizen, citizen_token) = app.member("Citizen", UserRole::User).await;
    let (other, _) = app.member("Other", UserRole::User).await;

    let own = app
        .request(
            "PUT",
            &format!("/api/users/{}/profile", citizen.id),
            Some(json!({ "name": "Citizen Kane", "email": " KANE@resq.test " })),
            Some(&citizen_token),
        )
        .await;
    assert_eq!(own.status, StatusCode::OK);
    assert_eq!(own.body["message"], "Profile updated successfully");
    assert_eq!(own.body["user"]["name"], "Citizen Kane");
    assert_eq!(own.body["user"]["email"], "kane@resq.test");

    let someone_else = app
        .request(
            "PUT",
            &format!("/api/users/{}/profile", other.id),
            Some(json!({ "name": "Hijacked" })),
            Some(&citizen_token),
        )
        .await;
    assert_eq!(someone_else.status, StatusCode::FORBIDDEN);
    assert_eq!(someone_else.body["message"], "Access denied");

    let by_admin = app
        .request(
            "PUT",
            &format!("/api/users/{}/profile", other.id),
            Some(json!({ "name": "Renamed" })),
            Some(&admin_token),
        )
        .await;
    assert_eq!(by_admin.status, StatusCode::OK);
    assert_eq!(by_admin.body["user"]["name"], "Renamed");
}

#[tokio::test]
async fn test_profile_email_conflict() {
    let app = TestApp::new();
    let (citizen, citizen_token) = app.member("Citizen", UserRole::User).await;
    app.member("Other", UserRole::User).await;

    let response = app
        .request(
            "PUT",
            &format!("/api/users/{}/profile", citizen.id),
            Some(json!({ "email": "other@resq.test" })),
            Some(&citizen_token),
        )
        .await;
    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_delete_user() {
    let app = TestApp::new();
    let (admin, admin_token) = app.admin().await;
    let (citizen, citizen_token) = app.member("Citizen", UserRole::User).await;

    let own = app
        .request("DELETE", &format!("/api/users/{}", admin.id), None, Some(&admin_token))
        .await;
    assert_eq!(own.status, StatusCode::BAD_REQUEST);
    assert_eq!(own.body["message"], "Cannot delete your own account");

    let deleted = app
        .request("DELETE", &format!("/api/users/{}", citizen.id), None, Some(&admin_token))
        .await;
    assert_eq!(deleted.status, StatusCode::OK);
    assert_eq!(deleted.body["message"], "User deleted successfully");

    let again = app
        .request("DELETE", &format!("/api/users/{}", citizen.id), None, Some(&admin_token))
        .await;
    assert_eq!(again.status, StatusCode::NOT_FOUND);

    // The token is still well-formed, but its account is gone.
    let me = app.request("GET", "/api/auth/me", None, Some(&citizen_token)).await;
    assert_eq!(me.status, StatusCode::NOT_FOUND);
}
