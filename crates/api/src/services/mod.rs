//! Business services.
//!
//! Handlers call services; services validate input, call the repositories,
//! keep the response cache coherent and publish events. Everything a service
//! needs is injected through [`Services::new`].

use std::sync::Arc;
use std::time::Duration;

use stockroom_cache::Cache;
use stockroom_db::DbPool;
use stockroom_events::EventBus;

use crate::metrics::Metrics;

pub mod cache_aside;
pub mod goods;
pub mod project;

pub use cache_aside::CacheAside;
pub use goods::GoodsService;
pub use project::ProjectService;

/// All services, built once at startup.
#[derive(Clone)]
pub struct Services {
    pub projects: ProjectService,
    pub goods: GoodsService,
}

impl Services {
    pub fn new(
        pool: DbPool,
        cache: Arc<dyn Cache>,
        ttl: Duration,
        metrics: Arc<Metrics>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let cache = CacheAside::new(cache, ttl, metrics.clone());
        Self {
            projects: ProjectService::new(pool.clone(), cache.clone()),
            goods: GoodsService::new(pool, cache, metrics, event_bus),
        }
    }
}
