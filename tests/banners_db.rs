//! End-to-end CRUD against a real PostgreSQL instance.
//!
//! These tests need `DATABASE_URL` pointing at a scratch database and are
//! ignored by default:
//!
//!   DATABASE_URL=postgres://... cargo test -- --ignored --test-threads=1

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use chrono::Utc;
use serde_json::{json, Value};
use tower::util::ServiceExt;
use ulid::Ulid;
use url::Url;

use banner_api::{
    app,
    config::{Config, Environment},
    db, AppState,
};

async fn test_state() -> AppState {
    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL required for database tests");
    let config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        database_url: database_url.clone(),
        base_url: Url::parse("http://localhost:3000").unwrap(),
        public_api_url: Url::parse("http://localhost:3000").unwrap(),
        environment: Environment::Development,
    };
    let pool = db::create_pool(&database_url).await.unwrap();
    db::run_migrations(&pool).await.unwrap();
    AppState::new(pool, Arc::new(config))
}

async fn send(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
    let response = app::api_app(state.clone()).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post_json(uri: String, payload: &Value) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get(uri: String) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn payload(name: &str, active: bool) -> Value {
    json!({
        "name": name,
        "description": "integration test banner",
        "expiresAt": Utc::now().timestamp() + 3600,
        "isActive": active,
    })
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn banner_crud_end_to_end() {
    let state = test_state().await;
    let before_create_ms = Utc::now().timestamp_millis();

    // Create assigns a sortable id and a server-side creation time.
    let (status, body) = send(&state, post_json("/api/banners".into(), &payload("First", true))).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["code"], json!("OK"));
    let banner = &body["data"]["banner"];
    let id = banner["id"].as_str().unwrap().to_string();
    assert!(Ulid::from_string(&id).is_ok());
    assert!(banner["createdAt"].as_i64().unwrap() >= before_create_ms - 1_000);
    assert_eq!(banner["updatedAt"], Value::Null);

    // Ids are unique across calls.
    let (_, second) = send(&state, post_json("/api/banners".into(), &payload("Second", false))).await;
    assert_ne!(second["data"]["banner"]["id"], banner["id"]);

    // Get by id round-trips the stored row.
    let (status, fetched) = send(&state, get(format!("/api/banners/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"]["banner"]["id"], json!(id.clone()));
    assert_eq!(fetched["data"]["banner"]["name"], json!("First"));

    // Get on a well-formed unknown id: 200 with the banner key absent.
    let missing = Ulid::new().to_string();
    let (status, absent) = send(&state, get(format!("/api/banners/{missing}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(absent["data"].get("banner").is_none());

    // Update on an unknown id is an explicit not-found.
    let (status, not_found) = send(
        &state,
        post_json(format!("/api/banners/{missing}"), &payload("Ghost", true)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(not_found["code"], json!("NOT_FOUND"));

    // Update stamps updatedAt and leaves id/createdAt untouched.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let (status, updated) = send(
        &state,
        post_json(format!("/api/banners/{id}"), &payload("First, renamed", true)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = &updated["data"]["banner"];
    assert_eq!(updated["id"], json!(id.clone()));
    assert_eq!(updated["createdAt"], banner["createdAt"]);
    assert_eq!(updated["name"], json!("First, renamed"));
    let first_update_ms = updated["updatedAt"].as_i64().unwrap();
    assert!(first_update_ms >= banner["createdAt"].as_i64().unwrap());

    // A second update moves updatedAt strictly forward.
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let (_, again) = send(
        &state,
        post_json(format!("/api/banners/{id}"), &payload("First, again", true)),
    )
    .await;
    assert!(again["data"]["banner"]["updatedAt"].as_i64().unwrap() > first_update_ms);
}

#[tokio::test]
#[ignore = "requires a PostgreSQL database"]
async fn list_surfaces_only_the_latest_active_banner() {
    let state = test_state().await;

    // Start from a clean slate so older rows cannot win the ordering.
    sqlx::query("UPDATE banners SET is_active = FALSE")
        .execute(&state.db)
        .await
        .unwrap();

    // No active banners: an empty list, not an error.
    let (status, body) = send(&state, get("/api/banners".into())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["banners"], json!([]));

    // Several actives: only the most recently created one is surfaced.
    send(&state, post_json("/api/banners".into(), &payload("Older", true))).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    send(&state, post_json("/api/banners".into(), &payload("Newer", true))).await;
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    send(&state, post_json("/api/banners".into(), &payload("Inactive", false))).await;

    let (status, body) = send(&state, get("/api/banners".into())).await;
    assert_eq!(status, StatusCode::OK);
    let banners = body["data"]["banners"].as_array().unwrap();
    assert_eq!(banners.len(), 1);
    assert_eq!(banners[0]["name"], json!("Newer"));
}
