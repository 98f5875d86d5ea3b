mod common;

use poem::http::StatusCode;
use serde_json::json;

use common::{body_json, cookie_pair, set_cookie, signup, spawn_app};

#[tokio::test]
async fn test_signup_wrong_password_then_login() {
    let app = spawn_app().await;

    let resp = signup(&app, "ana@example.com", "ana", "user").await;
    resp.assert_status(StatusCode::CREATED);
    let cookie = set_cookie(&resp);
    assert!(cookie.starts_with("refreshToken="));
    assert!(cookie.contains("HttpOnly"));
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["user"]["email"], json!("ana@example.com"));
    assert_eq!(body["data"]["user"]["roles"], json!(["user"]));
    assert!(body["data"]["user"].get("password_hash").is_none());
    assert!(body["data"]["tokens"].get("refreshToken").is_none());

    let resp = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ana@example.com", "password": "wrong-password" }))
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ana@example.com", "password": "s3cret-pass" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert!(set_cookie(&resp).starts_with("refreshToken="));
    let body = body_json(resp).await;
    assert!(!body["data"]["tokens"]["accessToken"].as_str().unwrap().is_empty());
    assert_eq!(body["data"]["tokens"]["expiresIn"], json!(3600));
}

#[tokio::test]
async fn test_signup_duplicate_is_bad_request() {
    let app = spawn_app().await;

    signup(&app, "ana@example.com", "ana", "user")
        .await
        .assert_status(StatusCode::CREATED);

    let resp = signup(&app, "ana@example.com", "ana2", "user").await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("User already exists"));
}

#[tokio::test]
async fn test_signup_rejects_malformed_email() {
    let app = spawn_app().await;

    signup(&app, "not-an-email", "ana", "user")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_rejects_malformed_email() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ana.example.com", "password": "s3cret-pass" }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], json!("Please provide a valid email"));
}

#[tokio::test]
async fn test_login_unknown_email_is_unauthorized() {
    let app = spawn_app().await;

    app.client
        .post("/api/auth/login")
        .body_json(&json!({ "email": "ghost@example.com", "password": "whatever" }))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_rotates_and_rejects_reuse() {
    let app = spawn_app().await;
    let resp = signup(&app, "ana@example.com", "ana", "user").await;
    let first = cookie_pair(&set_cookie(&resp));

    let resp = app
        .client
        .post("/api/auth/refresh-token")
        .header("Cookie", &first)
        .send()
        .await;
    resp.assert_status_is_ok();
    let second = cookie_pair(&set_cookie(&resp));
    assert_ne!(first, second);
    let body = body_json(resp).await;
    assert!(body["data"]["tokens"]["accessToken"].is_string());

    let resp = app
        .client
        .post("/api/auth/refresh-token")
        .header("Cookie", &first)
        .send()
        .await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&resp).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_refresh_without_cookie_is_unauthorized() {
    let app = spawn_app().await;

    let resp = app.client.post("/api/auth/refresh-token").send().await;
    resp.assert_status(StatusCode::UNAUTHORIZED);
    assert!(set_cookie(&resp).contains("Max-Age=0"));
}

#[tokio::test]
async fn test_revoke_token_lifecycle() {
    let app = spawn_app().await;
    let resp = signup(&app, "ana@example.com", "ana", "user").await;
    let cookie = cookie_pair(&set_cookie(&resp));
    let body = body_json(resp).await;
    let access = body["data"]["tokens"]["accessToken"].as_str().unwrap().to_string();
    let bearer = format!("Bearer {}", access);

    // Missing cookie
    app.client
        .post("/api/auth/revoke-token")
        .header("Authorization", &bearer)
        .send()
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let resp = app
        .client
        .post("/api/auth/revoke-token")
        .header("Authorization", &bearer)
        .header("Cookie", &cookie)
        .send()
        .await;
    resp.assert_status_is_ok();
    assert!(set_cookie(&resp).contains("Max-Age=0"));
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Token revoked successfully"));

    // Already revoked
    app.client
        .post("/api/auth/revoke-token")
        .header("Authorization", &bearer)
        .header("Cookie", &cookie)
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // Revoked token cannot refresh
    app.client
        .post("/api/auth/refresh-token")
        .header("Cookie", &cookie)
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_reports_database_up() {
    let app = spawn_app().await;

    let resp = app.client.get("/api/health").send().await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["status"], json!("healthy"));
    assert_eq!(body["database"], json!("up"));
}
