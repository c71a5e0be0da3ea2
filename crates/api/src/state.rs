use std::sync::Arc;

use crate::config::ServerConfig;
use crate::metrics::Metrics;
use crate::services::Services;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: stockroom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Project and goods services.
    pub services: Arc<Services>,
    /// Prometheus registry rendered by `GET /metrics`.
    pub metrics: Arc<Metrics>,
}
