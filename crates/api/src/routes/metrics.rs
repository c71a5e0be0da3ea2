use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::error::{AppError, AppResult};
use crate::state::AppState;

const OPENMETRICS_CONTENT_TYPE: &str = "application/openmetrics-text; version=1.0.0; charset=utf-8";

/// GET /metrics -- Prometheus scrape endpoint.
async fn scrape(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| AppError::InternalError(format!("failed to encode metrics: {e}")))?;
    Ok(([(CONTENT_TYPE, OPENMETRICS_CONTENT_TYPE)], body))
}

/// Mount the metrics route (root level, not under `/api`).
pub fn router() -> Router<AppState> {
    Router::new().route("/metrics", get(scrape))
}
