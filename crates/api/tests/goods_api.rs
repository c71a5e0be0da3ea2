//! HTTP-level integration tests for the `/api/goods` CRUD endpoints.

mod common;

use axum::http::StatusCode;
use common::{body_json, body_text, delete, get, patch_json, post_json};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_returns_201(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let response = post_json(
        app,
        &format!("/api/goods/{project_id}"),
        json!({"name": "Widget", "description": "blue"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Widget");
    assert_eq!(json["description"], "blue");
    assert_eq!(json["project_id"], project_id);
    assert_eq!(json["priority"], 1);
    assert_eq!(json["removed"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_description_defaults_to_name(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let json = common::create_goods(&app, project_id, json!({"name": "Widget", "description": ""})).await;
    assert_eq!(json["description"], "Widget");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_without_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let response = post_json(app, &format!("/api/goods/{project_id}"), json!({})).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "name is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_negative_priority_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let response = post_json(
        app,
        &format!("/api/goods/{project_id}"),
        json!({"name": "Widget", "priority": -2}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_in_missing_project_returns_409(pool: PgPool) {
    let app = common::build_test_app(pool);

    let response = post_json(app, "/api/goods/999999", json!({"name": "Orphan"})).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(body_json(response).await["message"].is_string());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_goods_at_explicit_priority_shifts_others(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let a = common::create_goods(&app, project_id, json!({"name": "A"})).await;
    let b = common::create_goods(&app, project_id, json!({"name": "B"})).await;
    let c = common::create_goods(&app, project_id, json!({"name": "C", "priority": 1})).await;

    let ids = |v: &serde_json::Value| v["id"].as_i64().unwrap();
    assert_eq!(
        common::ranking(&app, project_id).await,
        vec![(ids(&c), 1), (ids(&a), 2), (ids(&b), 3)]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_goods_in_wrong_project_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let other = common::create_project(&app, "Other").await;
    let goods = common::create_goods(&app, project_id, json!({"name": "Widget"})).await;
    let goods_id = goods["id"].as_i64().unwrap();

    let response = get(app, &format!("/api/goods/{other}/{goods_id}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], 3);
    assert_eq!(json["message"], "errors.good.NotFound");
    assert_eq!(json["status"], 404);
    assert_eq!(json["detail"], format!("Goods with id {goods_id} not found"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_goods_is_never_served_stale(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let goods = common::create_goods(&app, project_id, json!({"name": "Widget"})).await;
    let uri = format!("/api/goods/{project_id}/{}", goods["id"]);

    // Prime the point-read cache.
    assert_eq!(body_json(get(app.clone(), &uri).await).await["name"], "Widget");

    let response = patch_json(app.clone(), &uri, json!({"name": "Gizmo"})).await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated = body_json(response).await;
    assert_eq!(updated["name"], "Gizmo");
    assert_eq!(updated["description"], "Widget");
    assert_eq!(updated["priority"], 1);

    assert_eq!(body_json(get(app, &uri).await).await["name"], "Gizmo");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_goods_blank_name_returns_400(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let goods = common::create_goods(&app, project_id, json!({"name": "Widget"})).await;

    let response = patch_json(
        app,
        &format!("/api/goods/{project_id}/{}", goods["id"]),
        json!({"name": " "}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_nonexistent_goods_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let response = patch_json(
        app,
        &format!("/api/goods/{project_id}/999999"),
        json!({"name": "x"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_from_listing_and_counts_as_removed(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let keep = common::create_goods(&app, project_id, json!({"name": "Keep"})).await;
    let gone = common::create_goods(&app, project_id, json!({"name": "Gone"})).await;
    let gone_id = gone["id"].as_i64().unwrap();

    // Prime the listing cache.
    let before = body_json(get(app.clone(), "/api/goods/list").await).await;
    assert_eq!(before["meta"]["removed"], 0);
    assert_eq!(before["meta"]["total"], 2);

    let response = delete(app.clone(), &format!("/api/goods/{project_id}/{gone_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["removed"], true);

    let after = body_json(get(app.clone(), "/api/goods/list").await).await;
    assert_eq!(after["meta"]["removed"], 1);
    assert_eq!(after["meta"]["total"], 2);
    let listed: Vec<i64> = after["goods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["id"].as_i64().unwrap())
        .collect();
    assert_eq!(listed, vec![keep["id"].as_i64().unwrap()]);

    let response = get(app, &format!("/api/goods/{project_id}/{gone_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["removed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_is_idempotent(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let goods = common::create_goods(&app, project_id, json!({"name": "Widget"})).await;
    let uri = format!("/api/goods/{project_id}/{}", goods["id"]);

    let first = delete(app.clone(), &uri).await;
    assert_eq!(first.status(), StatusCode::OK);
    let second = delete(app, &uri).await;
    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(body_json(second).await["removed"], true);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_closes_gap(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let a = common::create_goods(&app, project_id, json!({"name": "A"})).await;
    let b = common::create_goods(&app, project_id, json!({"name": "B"})).await;
    let c = common::create_goods(&app, project_id, json!({"name": "C"})).await;

    // Prime the point read of C, which the removal displaces.
    let c_uri = format!("/api/goods/{project_id}/{}", c["id"]);
    assert_eq!(body_json(get(app.clone(), &c_uri).await).await["priority"], 3);

    delete(app.clone(), &format!("/api/goods/{project_id}/{}", b["id"])).await;

    assert_eq!(
        common::ranking(&app, project_id).await,
        vec![(a["id"].as_i64().unwrap(), 1), (c["id"].as_i64().unwrap(), 2)]
    );
    assert_eq!(body_json(get(app, &c_uri).await).await["priority"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_nonexistent_goods_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;

    let response = delete(app, &format!("/api/goods/{project_id}/999999")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_goods_list_orders_by_project_then_priority(pool: PgPool) {
    let app = common::build_test_app(pool);
    let p1 = common::create_project(&app, "One").await;
    let p2 = common::create_project(&app, "Two").await;
    common::create_goods(&app, p2, json!({"name": "p2-a"})).await;
    common::create_goods(&app, p1, json!({"name": "p1-a"})).await;
    common::create_goods(&app, p1, json!({"name": "p1-b", "priority": 1})).await;

    let json = body_json(get(app, "/api/goods/list").await).await;
    let names: Vec<&str> = json["goods"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["p1-b", "p1-a", "p2-a"]);
    assert_eq!(json["meta"]["limit"], 10);
    assert_eq!(json["meta"]["offset"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_read_metric_counts_only_found_goods(pool: PgPool) {
    let app = common::build_test_app(pool);
    let project_id = common::create_project(&app, "Acme").await;
    let goods = common::create_goods(&app, project_id, json!({"name": "Widget"})).await;

    let response = get(app.clone(), "/api/goods/424242/1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let response = get(app.clone(), &format!("/api/goods/{project_id}/{}", goods["id"])).await;
    assert_eq!(response.status(), StatusCode::OK);

    let text = body_text(get(app, "/metrics").await).await;
    assert!(!text.contains(r#"project_id="424242""#));
    assert!(text.contains(&format!(
        r#"stockroom_goods_reads_total{{project_id="{project_id}"}} 1"#
    )));
}
