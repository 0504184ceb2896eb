#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use carlog_api::config::{CorsOrigins, LogFormat, ServerConfig};
use carlog_api::router::build_app_router;
use carlog_api::state::AppState;
use carlog_db::DbPool;

pub const HONDA_VIN: &str = "1HGCM82633A004352";
pub const TESLA_VIN: &str = "5YJSA1E18HF000001";
pub const BMW_VIN: &str = "WBA3A5C53CF256551";

/// Build a test `ServerConfig` backed by an in-memory database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: [127, 0, 0, 1].into(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        db_max_connections: 1,
        debug: true,
        log_format: LogFormat::Pretty,
        cors_origins: CorsOrigins::Any,
        request_timeout_secs: 30,
        save_decoded: false,
    }
}

/// Fresh in-memory store with migrations applied.
pub async fn test_pool() -> DbPool {
    let pool = carlog_db::create_pool("sqlite::memory:", 1)
        .await
        .expect("in-memory pool");
    carlog_db::run_migrations(&pool)
        .await
        .expect("migrations");
    pool
}

/// Build the full application router over `pool` with the production
/// middleware stack.
pub fn build_test_app_with(pool: DbPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

pub fn build_test_app(pool: DbPool) -> Router {
    build_test_app_with(pool, test_config())
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    send(app, Method::DELETE, uri, None).await
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> Response {
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

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the parsed body.
pub async fn expect_json(response: Response, status: StatusCode) -> Value {
    assert_eq!(response.status(), status);
    body_json(response).await
}
