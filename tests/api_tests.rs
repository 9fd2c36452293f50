/// Router-level tests: requests go through the full axum stack
mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use common::{expect_no_calls, mount_status, Upstreams};
use rust_name_guesser::errors::GENERIC_GUESS_ERROR;
use rust_name_guesser::handlers::{router, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn app(upstreams: &Upstreams) -> Router {
    router(Arc::new(AppState::new(&upstreams.config())))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn mount_alice(upstreams: &Upstreams) {
    upstreams
        .mount_all(
            "Alice",
            json!(34),
            json!("female"),
            json!([{"country_id": "US", "probability": 0.5}]),
        )
        .await;
}

#[tokio::test]
async fn test_health() {
    let upstreams = Upstreams::start().await;
    let (status, body) = send(&app(&upstreams), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_index_page() {
    let upstreams = Upstreams::start().await;
    let (status, body) = send(&app(&upstreams), get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Guesser"));
}

#[tokio::test]
async fn test_post_guess_success() {
    let upstreams = Upstreams::start().await;
    mount_alice(&upstreams).await;

    let (status, body) = send(
        &app(&upstreams),
        post_json("/api/v1/guess", json!({"name": "Alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"age": 34, "gender": "female", "country_display_name": "United States"})
    );
}

#[tokio::test]
async fn test_get_guess_with_query() {
    let upstreams = Upstreams::start().await;
    mount_alice(&upstreams).await;

    let (status, body) = send(&app(&upstreams), get("/api/v1/guess?name=Alice")).await;

    assert_eq!(status, StatusCode::OK);
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["age"], 34);
}

#[tokio::test]
async fn test_blank_name_is_bad_request() {
    let upstreams = Upstreams::start().await;
    let app = app(&upstreams);

    let (status, body) = send(&app, post_json("/api/v1/guess", json!({"name": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": "Name cannot be empty"})
    );

    let (status, _) = send(&app, get("/api/v1/guess")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

fn error_message(body: &str) -> String {
    let body: Value = serde_json::from_str(body).expect("error body should be JSON");
    body["error"]
        .as_str()
        .expect("error body should carry an error field")
        .to_string()
}

#[tokio::test]
async fn test_body_without_name_is_json_bad_request() {
    let upstreams = Upstreams::start().await;
    expect_no_calls(&upstreams.agify).await;
    let app = app(&upstreams);

    let (status, body) = send(&app, post_json("/api/v1/guess", json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("name"));
}

#[tokio::test]
async fn test_malformed_body_is_json_bad_request() {
    let upstreams = Upstreams::start().await;
    expect_no_calls(&upstreams.agify).await;
    let app = app(&upstreams);

    let broken = Request::builder()
        .method("POST")
        .uri("/api/v1/guess")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\":"))
        .unwrap();
    let (status, body) = send(&app, broken).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());

    let untyped = Request::builder()
        .method("POST")
        .uri("/api/v1/guess")
        .body(Body::from("name=Alice"))
        .unwrap();
    let (status, body) = send(&app, untyped).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!error_message(&body).is_empty());
}

#[tokio::test]
async fn test_session_body_without_name_keeps_state() {
    let upstreams = Upstreams::start().await;
    expect_no_calls(&upstreams.agify).await;
    let app = app(&upstreams);

    let (_, body) = send(&app, post_json("/api/v1/sessions", json!({}))).await;
    let id = serde_json::from_str::<Value>(&body).unwrap()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, body) = send(
        &app,
        post_json(&format!("/api/v1/sessions/{}/guess", id), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_message(&body).contains("name"));

    let (_, body) = send(&app, get(&format!("/api/v1/sessions/{}", id))).await;
    let current: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(current["state"], json!({"status": "idle"}));
}

#[tokio::test]
async fn test_upstream_failure_is_generic_bad_gateway() {
    let upstreams = Upstreams::start().await;
    mount_status(&upstreams.agify, 500).await;

    let (status, body) = send(
        &app(&upstreams),
        post_json("/api/v1/guess", json!({"name": "Alice"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(
        serde_json::from_str::<Value>(&body).unwrap(),
        json!({"error": GENERIC_GUESS_ERROR})
    );
    assert!(!body.contains("500"));
    assert!(!body.contains("upstream exploded"));
}

#[tokio::test]
async fn test_session_flow() {
    let upstreams = Upstreams::start().await;
    mount_alice(&upstreams).await;
    let app = app(&upstreams);

    let (status, body) = send(&app, post_json("/api/v1/sessions", json!({}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(created["state"], json!({"status": "idle"}));
    let id = created["session_id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        post_json(
            &format!("/api/v1/sessions/{}/guess", id),
            json!({"name": "Alice"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let settled: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(settled["state"]["status"], "success");
    assert_eq!(settled["state"]["ticket"], 1);
    assert_eq!(
        settled["state"]["result"]["country_display_name"],
        "United States"
    );

    let (status, body) = send(&app, get(&format!("/api/v1/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::OK);
    let current: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(current["state"], settled["state"]);
}

#[tokio::test]
async fn test_session_blank_name_keeps_state() {
    let upstreams = Upstreams::start().await;
    let app = app(&upstreams);

    let (_, body) = send(&app, post_json("/api/v1/sessions", json!({}))).await;
    let id = serde_json::from_str::<Value>(&body).unwrap()["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let (status, _) = send(
        &app,
        post_json(&format!("/api/v1/sessions/{}/guess", id), json!({"name": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, body) = send(&app, get(&format!("/api/v1/sessions/{}", id))).await;
    let current: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(current["state"], json!({"status": "idle"}));
}

#[tokio::test]
async fn test_unknown_session_is_not_found() {
    let upstreams = Upstreams::start().await;
    let app = app(&upstreams);
    let id = uuid::Uuid::new_v4();

    let (status, _) = send(&app, get(&format!("/api/v1/sessions/{}", id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        post_json(
            &format!("/api/v1/sessions/{}/guess", id),
            json!({"name": "Alice"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_openapi_document_lists_guess_routes() {
    let upstreams = Upstreams::start().await;
    let (status, body) = send(&app(&upstreams), get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_str(&body).unwrap();
    assert!(doc["paths"]["/api/v1/guess"].is_object());
    assert!(doc["paths"]["/api/v1/sessions/{id}/guess"].is_object());
}
