#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use stockroom_api::config::{LogFormat, ServerConfig};
use stockroom_api::metrics::Metrics;
use stockroom_api::router::build_app_router;
use stockroom_api::services::Services;
use stockroom_api::state::AppState;
use stockroom_cache::{Cache, MemoryCache};
use stockroom_events::EventBus;

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        db_max_connections: 5,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        cache_enabled: true,
        redis_url: None,
        cache_ttl_secs: 60,
        cache_max_entries: 1_000,
        log_format: LogFormat::Pretty,
    }
}

/// Build the full application router backed by a fresh in-process cache.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_cache(pool, Arc::new(MemoryCache::new()))
}

/// Build the full application router with the given cache backend.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app_with_cache(pool: PgPool, cache: Arc<dyn Cache>) -> Router {
    let config = test_config();
    let metrics = Arc::new(Metrics::new());
    let event_bus = Arc::new(EventBus::default());

    let services = Services::new(
        pool.clone(),
        cache,
        Duration::from_secs(config.cache_ttl_secs),
        Arc::clone(&metrics),
        event_bus,
    );
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        services: Arc::new(services),
        metrics,
    };

    build_app_router(state, &config)
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
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

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn patch(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::PATCH, uri, None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Create a project through the API and return its id.
pub async fn create_project(app: &Router, name: &str) -> i64 {
    let response = post_json(
        app.clone(),
        "/api/projects",
        serde_json::json!({ "name": name }),
    )
    .await;
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create goods through the API and return the response body.
pub async fn create_goods(app: &Router, project_id: i64, body: serde_json::Value) -> serde_json::Value {
    let response = post_json(app.clone(), &format!("/api/goods/{project_id}"), body).await;
    body_json(response).await
}

/// `(id, priority)` of the active goods of one project, from the listing.
pub async fn ranking(app: &Router, project_id: i64) -> Vec<(i64, i64)> {
    let listing = body_json(get(app.clone(), "/api/goods/list?limit=100").await).await;
    listing["goods"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|g| g["project_id"].as_i64() == Some(project_id))
        .map(|g| (g["id"].as_i64().unwrap(), g["priority"].as_i64().unwrap()))
        .collect()
}
