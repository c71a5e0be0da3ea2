//! Prometheus metrics.
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `stockroom_cache_hits_total` | Counter | `resource` |
//! | `stockroom_cache_misses_total` | Counter | `resource` |
//! | `stockroom_goods_reads_total` | Counter | `project_id` |
//! | `stockroom_reprioritizations_total` | Counter | none |
//!
//! `GET /metrics` renders the registry on each scrape.

use prometheus_client::encoding::text::encode;
use prometheus_client::encoding::EncodeLabelSet;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::family::Family;
use prometheus_client::registry::Registry;
use stockroom_core::types::DbId;

/// Label set for cache counters: which response kind was looked up.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ResourceLabel {
    pub resource: String,
}

/// Label set for per-project read counters.
#[derive(Clone, Debug, Hash, PartialEq, Eq, EncodeLabelSet)]
pub struct ProjectLabel {
    pub project_id: String,
}

/// Registry plus handles to every registered metric.
///
/// Metric handles are atomic and safe to update from any task.
pub struct Metrics {
    registry: Registry,
    pub cache_hits: Family<ResourceLabel, Counter>,
    pub cache_misses: Family<ResourceLabel, Counter>,
    pub goods_reads: Family<ProjectLabel, Counter>,
    pub reprioritizations: Counter,
}

impl Metrics {
    pub fn new() -> Self {
        let mut registry = Registry::default();

        let cache_hits = Family::<ResourceLabel, Counter>::default();
        registry.register(
            "stockroom_cache_hits",
            "Responses served from the cache",
            cache_hits.clone(),
        );

        let cache_misses = Family::<ResourceLabel, Counter>::default();
        registry.register(
            "stockroom_cache_misses",
            "Cache lookups that fell through to the database",
            cache_misses.clone(),
        );

        let goods_reads = Family::<ProjectLabel, Counter>::default();
        registry.register(
            "stockroom_goods_reads",
            "Point reads of goods by project",
            goods_reads.clone(),
        );

        let reprioritizations = Counter::default();
        registry.register(
            "stockroom_reprioritizations",
            "Completed goods reprioritizations",
            reprioritizations.clone(),
        );

        Self {
            registry,
            cache_hits,
            cache_misses,
            goods_reads,
            reprioritizations,
        }
    }

    pub fn cache_hit(&self, resource: &str) {
        self.cache_hits
            .get_or_create(&ResourceLabel {
                resource: resource.to_string(),
            })
            .inc();
    }

    pub fn cache_miss(&self, resource: &str) {
        self.cache_misses
            .get_or_create(&ResourceLabel {
                resource: resource.to_string(),
            })
            .inc();
    }

    pub fn goods_read(&self, project_id: DbId) {
        self.goods_reads
            .get_or_create(&ProjectLabel {
                project_id: project_id.to_string(),
            })
            .inc();
    }

    /// Render all metrics in the OpenMetrics text format.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut buf = String::new();
        encode(&mut buf, &self.registry)?;
        Ok(buf)
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}
