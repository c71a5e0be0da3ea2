pub mod goods;
pub mod health;
pub mod metrics;
pub mod project;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /projects                                 list, create
/// /projects/{project_id}                    get, update, delete
///
/// /goods/list                               list active goods
/// /goods/prioritize/{project_id}/{id}       reprioritize (?priority=N)
/// /goods/{project_id}                       create
/// /goods/{project_id}/{id}                  get, update, soft delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/projects", project::router())
        .nest("/goods", goods::router())
}
