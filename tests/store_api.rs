//! Collections, environments and history routes, driven through the router directly.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stormer::config::StormerConfig;
use stormer::execute::HttpMethod;
use stormer::store::{HistoryEntry, Stores};
use stormer::HttpServer;

fn app() -> (Router, Stores) {
    let config = StormerConfig::default();
    let stores = Stores::in_memory(&config.history);
    let server = HttpServer::new(config, stores.clone()).unwrap();
    (server.router(), stores)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_collection_lifecycle() {
    let (app, _) = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/collections",
        Some(json!({
            "name": "Users API",
            "requests": [{
                "name": "List users",
                "method": "GET",
                "url": "localhost:3001/users",
                "params": [{ "key": "page", "value": "1" }],
            }],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Users API");
    assert_eq!(created["description"], "");
    assert!(created["createdAt"].is_string());
    assert_eq!(created["requests"][0]["params"][0]["enabled"], true);
    let id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send(&app, "GET", "/api/collections", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/collections/{id}"),
        Some(json!({ "description": "All user endpoints" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Users API");
    assert_eq!(updated["description"], "All user endpoints");
    assert_eq!(updated["createdAt"], created["createdAt"]);

    let (status, fetched) = send(&app, "GET", &format!("/api/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, updated);

    let (status, _) = send(&app, "DELETE", &format!("/api/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, "GET", &format!("/api/collections/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Collection not found" }));
}

#[tokio::test]
async fn test_collection_requires_name() {
    let (app, _) = app();
    let (status, _) = send(&app, "POST", "/api/collections", Some(json!({ "description": "x" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bad_id_is_bad_request() {
    let (app, _) = app();
    let (status, _) = send(&app, "GET", "/api/collections/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_environment_lifecycle() {
    let (app, stores) = app();

    let (status, created) = send(
        &app,
        "POST",
        "/api/environments",
        Some(json!({ "name": "local", "variables": { "baseUrl": "localhost:3001", "token": "t" } })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["variables"]["baseUrl"], "localhost:3001");
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(stores.environments.len(), 1);

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/api/environments/{id}"),
        Some(json!({ "variables": { "baseUrl": "api.example.com" } })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "local");
    assert_eq!(updated["variables"], json!({ "baseUrl": "api.example.com" }));

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(&app, "DELETE", &format!("/api/environments/{missing}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Environment not found");
}

#[tokio::test]
async fn test_history_routes() {
    let (app, stores) = app();
    stores
        .history
        .record(HistoryEntry::new(HttpMethod::Post, "http://localhost:3001/a", 201, 12))
        .await;
    stores
        .history
        .record(HistoryEntry::new(HttpMethod::Get, "http://localhost:3001/b", 200, 3))
        .await;

    let (status, listed) = send(&app, "GET", "/api/history", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed[0]["url"], "http://localhost:3001/b");
    assert_eq!(listed[1]["method"], "POST");
    assert_eq!(listed[1]["status"], 201);
    assert_eq!(listed[1]["time"], 12);

    let (status, _) = send(&app, "DELETE", "/api/history", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(stores.history.is_empty().await);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let (app, _) = app();
    let (status, _) = send(&app, "GET", "/api/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
