//! Handlers for the `/goods` resource.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use stockroom_core::types::DbId;
use stockroom_db::models::goods::{CreateGoods, Goods, GoodsPage, UpdateGoods};

use crate::error::AppResult;
use crate::extract::{JsonBody, PathParams};
use crate::query::{PaginationParams, PriorityParams};
use crate::state::AppState;

/// POST /api/goods/{project_id}
pub async fn create(
    State(state): State<AppState>,
    PathParams(project_id): PathParams<DbId>,
    JsonBody(input): JsonBody<CreateGoods>,
) -> AppResult<(StatusCode, Json<Goods>)> {
    let goods = state.services.goods.create(project_id, &input).await?;
    Ok((StatusCode::CREATED, Json(goods)))
}

/// GET /api/goods/list
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<GoodsPage>> {
    let listing = state.services.goods.list(params.page()).await?;
    Ok(Json(listing))
}

/// GET /api/goods/{project_id}/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    PathParams((project_id, id)): PathParams<(DbId, DbId)>,
) -> AppResult<Json<Goods>> {
    let goods = state.services.goods.get(id, project_id).await?;
    Ok(Json(goods))
}

/// PATCH /api/goods/{project_id}/{id}
pub async fn update(
    State(state): State<AppState>,
    PathParams((project_id, id)): PathParams<(DbId, DbId)>,
    JsonBody(input): JsonBody<UpdateGoods>,
) -> AppResult<Json<Goods>> {
    let goods = state.services.goods.update(id, project_id, &input).await?;
    Ok(Json(goods))
}

/// DELETE /api/goods/{project_id}/{id}
pub async fn remove(
    State(state): State<AppState>,
    PathParams((project_id, id)): PathParams<(DbId, DbId)>,
) -> AppResult<Json<Goods>> {
    let goods = state.services.goods.remove(id, project_id).await?;
    Ok(Json(goods))
}

/// PATCH /api/goods/prioritize/{project_id}/{id}?priority=N
pub async fn reprioritize(
    State(state): State<AppState>,
    PathParams((project_id, id)): PathParams<(DbId, DbId)>,
    Query(params): Query<PriorityParams>,
) -> AppResult<Json<Goods>> {
    let requested = params.requested()?;
    let goods = state
        .services
        .goods
        .reprioritize(id, project_id, requested)
        .await?;
    Ok(Json(goods))
}
