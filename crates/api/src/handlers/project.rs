//! Handlers for the `/projects` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};
use stockroom_core::types::DbId;
use stockroom_db::models::project::{CreateProject, Project, ProjectPage, UpdateProject};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParams};
use crate::query::PaginationParams;
use crate::state::AppState;

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    let project = state.services.projects.create(&input).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/projects
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ProjectPage>> {
    let listing = state.services.projects.list(params.page()).await?;
    Ok(Json(listing))
}

/// GET /api/projects/{project_id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PathParams(id): PathParams<DbId>,
) -> AppResult<Json<Project>> {
    let project = state.services.projects.get(id).await?;
    Ok(Json(project))
}

/// PATCH /api/projects/{project_id}
pub async fn update(
    State(state): State<AppState>,
    PathParams(id): PathParams<DbId>,
    JsonBody(input): JsonBody<UpdateProject>,
) -> AppResult<Json<Project>> {
    let project = state.services.projects.update(id, &input).await?;
    Ok(Json(project))
}

/// DELETE /api/projects/{project_id}
pub async fn delete(
    State(state): State<AppState>,
    PathParams(id): PathParams<DbId>,
) -> AppResult<Json<Value>> {
    state.services.projects.delete(id).await?;
    Ok(Json(json!({ "status": "ok" })))
}
