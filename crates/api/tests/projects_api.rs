//! HTTP-level integration tests for the `/api/projects` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", json!({"name": "Acme"})).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Acme");
    assert!(json["id"].is_number());
    assert!(json["created_at"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", json!({"name": "   "})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["message"], "name is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_project_malformed_body_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = post_json(app, "/api/projects", json!({"title": "no name"})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_project_by_id(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = common::create_project(&app, "Get Me").await;

    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Get Me");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["message"], "errors.project.NotFound");
    assert_eq!(json["detail"], "Project with id 999999 not found");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_integer_id_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects/abc").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(response).await["message"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_project(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = common::create_project(&app, "Original").await;

    // Prime the point-read cache.
    get(app.clone(), &format!("/api/projects/{id}")).await;

    let response = patch_json(
        app.clone(),
        &format!("/api/projects/{id}"),
        json!({"name": "Updated"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Updated");

    let response = get(app, &format!("/api/projects/{id}")).await;
    assert_eq!(body_json(response).await["name"], "Updated");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_project_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = common::create_project(&app, "Keep").await;

    let response = patch_json(app, &format!("/api/projects/{id}"), json!({"name": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = patch_json(app, "/api/projects/999999", json!({"name": "x"})).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_project_removes_it_and_its_goods(pool: PgPool) {
    let app = common::build_test_app(pool);
    let id = common::create_project(&app, "Doomed").await;
    let goods = common::create_goods(&app, id, json!({"name": "Widget"})).await;
    let goods_id = goods["id"].as_i64().unwrap();

    // Prime both point-read caches.
    get(app.clone(), &format!("/api/projects/{id}")).await;
    get(app.clone(), &format!("/api/goods/{id}/{goods_id}")).await;

    let response = delete(app.clone(), &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "ok"}));

    let response = get(app.clone(), &format!("/api/projects/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(app, &format!("/api/goods/{id}/{goods_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_nonexistent_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = delete(app, "/api/projects/999999").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_projects_paginates(pool: PgPool) {
    let app = common::build_test_app(pool);
    for name in ["A", "B", "C"] {
        common::create_project(&app, name).await;
    }

    let response = get(app.clone(), "/api/projects?limit=2&offset=1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meta"], json!({"total": 3, "limit": 2, "offset": 1}));
    let names: Vec<&str> = json["projects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["B", "C"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_projects_bad_pagination_uses_defaults(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/projects?limit=abc&offset=-3").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["meta"]["limit"], 10);
    assert_eq!(json["meta"]["offset"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_projects_not_stale_after_create(pool: PgPool) {
    let app = common::build_test_app(pool);
    common::create_project(&app, "First").await;

    let before = body_json(get(app.clone(), "/api/projects").await).await;
    assert_eq!(before["meta"]["total"], 1);

    common::create_project(&app, "Second").await;

    let after = body_json(get(app, "/api/projects").await).await;
    assert_eq!(after["meta"]["total"], 2);
}
