//! Route definitions for the `/goods` resource.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::goods;
use crate::state::AppState;

/// Routes mounted at `/goods`.
///
/// ```text
/// GET    /list                              -> list
/// PATCH  /prioritize/{project_id}/{id}      -> reprioritize
/// POST   /{project_id}                      -> create
/// GET    /{project_id}/{id}                 -> get_by_id
/// PATCH  /{project_id}/{id}                 -> update
/// DELETE /{project_id}/{id}                 -> remove
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/list", get(goods::list))
        .route("/prioritize/{project_id}/{id}", patch(goods::reprioritize))
        .route("/{project_id}", post(goods::create))
        .route(
            "/{project_id}/{id}",
            get(goods::get_by_id)
                .patch(goods::update)
                .delete(goods::remove),
        )
}
