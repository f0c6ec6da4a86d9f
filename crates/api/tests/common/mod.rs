#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

use taskflow_api::config::ServerConfig;
use taskflow_api::router::build_app_router;
use taskflow_api::state::AppState;

/// A `ServerConfig` with local-development defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        db_max_connections: 5,
        json_logs: false,
    }
}

/// The production router and middleware stack over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    build_app_router(AppState { pool }, &config)
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::POST, uri, None).await
}

pub async fn put_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a project spanning 2023 and return its id.
pub async fn seed_project(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/projects",
        serde_json::json!({
            "name": name,
            "start_date": "2023-01-01T00:00:00Z",
            "end_date": "2023-12-31T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "seeding project {name}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create an unfinished task in `project_id` and return its id.
pub async fn seed_task(app: &Router, project_id: i64, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/v1/tasks",
        serde_json::json!({
            "project_id": project_id,
            "name": name,
            "start_date": "2023-02-01T00:00:00Z",
        }),
    )
    .await;
    assert_eq!(response.status(), 201, "seeding task {name}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Violation rules in the order reported, from an error body.
pub fn violation_rules(body: &Value) -> Vec<String> {
    body["violations"]
        .as_array()
        .map(|vs| {
            vs.iter()
                .filter_map(|v| v["rule"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
