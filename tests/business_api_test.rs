mod common;

use poem::http::StatusCode;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

use common::{body_json, business_payload, seed, signup_token, spawn_app};
use localbiz_backend::errors::internal::CatalogKind;
use localbiz_backend::types::db::{business, contact_info, location, operating_hours};

fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

#[tokio::test]
async fn test_create_requires_owner_or_admin_role() {
    let app = spawn_app().await;
    let user = signup_token(&app, "u@example.com", "plainuser", "user").await;

    app.client
        .post("/api/businesses")
        .body_json(&business_payload("Acme", 1, "1 St"))
        .send()
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&user))
        .body_json(&business_payload("Acme", 1, "1 St"))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Business owner or admin privileges required"));
}

#[tokio::test]
async fn test_create_then_get_with_services() {
    let app = spawn_app().await;
    let services = seed(&app.db, CatalogKind::Service, &["Plumbing", "Electrical", "Carpentry"]).await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    let mut payload = business_payload("Acme Plumbing", 1, "12 Main St");
    payload["service_ids"] = json!(services);
    payload["operating_hours"] = json!([{ "day_of_week": "Mon", "open_time": "09:00", "close_time": "17:30" }]);

    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let body = body_json(resp).await;
    let id = body["data"]["id"].as_i64().unwrap();
    assert_eq!(body["data"]["status"], json!("pending_approval"));
    assert_eq!(body["data"]["owners"][0]["email"], json!("o@example.com"));

    let resp = app.client.get(format!("/api/businesses/{}", id)).send().await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    let names: Vec<&str> = body["data"]["services"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Plumbing", "Electrical", "Carpentry"]);
    assert_eq!(body["data"]["operating_hours"][0]["open_time"], json!("09:00:00"));
    assert_eq!(body["data"]["operating_hours"][0]["close_time"], json!("17:30:00"));
    assert_eq!(body["data"]["portfolio_images"], json!([]));
}

#[tokio::test]
async fn test_create_duplicate_is_conflict() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    for expected in [StatusCode::CREATED, StatusCode::CONFLICT] {
        app.client
            .post("/api/businesses")
            .header("Authorization", bearer(&owner))
            .body_json(&business_payload("Acme", 1, "12 Main St"))
            .send()
            .await
            .assert_status(expected);
    }

    assert_eq!(business::Entity::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_unknown_catalog_id_is_bad_request() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    let mut payload = business_payload("Acme", 1, "1 St");
    payload["brand_ids"] = json!([77]);

    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("Unknown brand id: 77"));
}

#[tokio::test]
async fn test_update_status_and_service_sets() {
    let app = spawn_app().await;
    let services = seed(&app.db, CatalogKind::Service, &["Plumbing", "Electrical"]).await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    let mut payload = business_payload("Acme", 1, "1 St");
    payload["service_ids"] = json!(services);
    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    let created = body_json(resp).await;
    let id = created["data"]["id"].as_i64().unwrap();
    let path = format!("/api/businesses/{}", id);

    // Status only: services untouched
    let resp = app
        .client
        .put(&path)
        .header("Authorization", bearer(&owner))
        .body_json(&json!({ "status": "approved" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["data"]["status"], json!("approved"));
    assert_eq!(body["data"]["name"], created["data"]["name"]);
    assert_eq!(body["data"]["services"].as_array().unwrap().len(), 2);

    // Empty list clears
    let resp = app
        .client
        .put(&path)
        .header("Authorization", bearer(&owner))
        .body_json(&json!({ "service_ids": [] }))
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["data"]["services"], json!([]));
}

#[tokio::test]
async fn test_update_and_delete_guards() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;
    let other = signup_token(&app, "x@example.com", "other", "business_owner").await;
    let admin = signup_token(&app, "a@example.com", "admin", "admin").await;

    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&business_payload("Acme", 1, "1 St"))
        .send()
        .await;
    let id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let path = format!("/api/businesses/{}", id);

    let resp = app
        .client
        .put(&path)
        .header("Authorization", bearer(&other))
        .body_json(&json!({ "name": "Hijacked" }))
        .send()
        .await;
    resp.assert_status(StatusCode::FORBIDDEN);
    let body = body_json(resp).await;
    assert_eq!(body["message"], json!("You do not have permission to update this business"));

    app.client
        .delete(&path)
        .header("Authorization", bearer(&other))
        .send()
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.client
        .put("/api/businesses/9999")
        .header("Authorization", bearer(&admin))
        .body_json(&json!({ "name": "Nope" }))
        .send()
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let resp = app
        .client
        .put(&path)
        .header("Authorization", bearer(&admin))
        .body_json(&json!({ "name": "Acme Renamed" }))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body_json(resp).await["data"]["name"], json!("Acme Renamed"));
}

#[tokio::test]
async fn test_delete_leaves_no_orphans() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    let mut payload = business_payload("Acme", 1, "1 St");
    payload["operating_hours"] = json!([{ "day_of_week": "Mon" }, { "day_of_week": "Tue" }]);
    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    let id = body_json(resp).await["data"]["id"].as_i64().unwrap();
    let path = format!("/api/businesses/{}", id);

    let resp = app
        .client
        .delete(&path)
        .header("Authorization", bearer(&owner))
        .send()
        .await;
    resp.assert_status_is_ok();
    assert_eq!(body_json(resp).await["message"], json!("Business deleted successfully"));

    app.client.get(&path).send().await.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(contact_info::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(location::Entity::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(operating_hours::Entity::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_list_pagination_and_filters() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    for (name, city) in [("Acme Plumbing", 1), ("Bolt Electric", 1), ("ACME Carpentry", 2), ("Delta", 2), ("Echo", 3)] {
        app.client
            .post("/api/businesses")
            .header("Authorization", bearer(&owner))
            .body_json(&business_payload(name, city, &format!("{} Road", name)))
            .send()
            .await
            .assert_status(StatusCode::CREATED);
    }

    let resp = app
        .client
        .get("/api/businesses")
        .query("page", &2)
        .query("limit", &2)
        .send()
        .await;
    resp.assert_status_is_ok();
    let body = body_json(resp).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
    assert_eq!(body["pagination"], json!({ "total": 5, "page": 2, "limit": 2, "pages": 3 }));
    assert!(body["data"][0].get("portfolio_images").is_none());

    let resp = app.client.get("/api/businesses").query("page", &4).query("limit", &2).send().await;
    let body = body_json(resp).await;
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["total"], json!(5));

    let resp = app.client.get("/api/businesses").query("name", &"acme").send().await;
    assert_eq!(body_json(resp).await["pagination"]["total"], json!(2));

    let resp = app.client.get("/api/businesses").query("city_id", &2).send().await;
    assert_eq!(body_json(resp).await["pagination"]["total"], json!(2));

    let resp = app.client.get("/api/businesses").query("status", &"approved").send().await;
    assert_eq!(body_json(resp).await["pagination"]["total"], json!(0));
}

#[tokio::test]
async fn test_list_rejects_oversized_pagination() {
    let app = spawn_app().await;

    let max = u64::MAX.to_string();
    let cases = [
        ("page", max.as_str(), "page is out of range"),
        ("limit", max.as_str(), "limit must not exceed 100"),
        ("limit", "101", "limit must not exceed 100"),
        ("limit", "0", "page and limit must be positive integers"),
    ];

    for (param, value, message) in cases {
        let resp = app.client.get("/api/businesses").query(param, &value).send().await;
        resp.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["message"], json!(message), "{}={}", param, value);
    }

    let resp = app
        .client
        .get("/api/businesses")
        .query("page", &"92233720368547760")
        .query("limit", &100)
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);

    let resp = app.client.get("/api/businesses").query("limit", &100).send().await;
    resp.assert_status_is_ok();
    assert_eq!(body_json(resp).await["pagination"]["limit"], json!(100));
}

#[tokio::test]
async fn test_malformed_contact_fields_are_rejected() {
    let app = spawn_app().await;
    let owner = signup_token(&app, "o@example.com", "owner", "business_owner").await;

    let mut payload = business_payload("Acme", 1, "1 St");
    payload["contact"]["email_primary"] = json!("not-an-email");
    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], json!("Invalid email_primary"));
    assert_eq!(business::Entity::find().count(&app.db).await.unwrap(), 0);

    let mut payload = business_payload("Acme", 1, "1 St");
    payload["contact"]["email_primary"] = json!("info@acme.example");
    payload["contact"]["website_url"] = json!("https://acme.example");
    let resp = app
        .client
        .post("/api/businesses")
        .header("Authorization", bearer(&owner))
        .body_json(&payload)
        .send()
        .await;
    resp.assert_status(StatusCode::CREATED);
    let id = body_json(resp).await["data"]["id"].as_i64().unwrap();

    let resp = app
        .client
        .put(format!("/api/businesses/{}", id))
        .header("Authorization", bearer(&owner))
        .body_json(&json!({ "contact": { "website_url": "acme dot example" } }))
        .send()
        .await;
    resp.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], json!("Invalid website_url"));
}
