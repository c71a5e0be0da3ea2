//! Goods operations, including reprioritization.
//!
//! Every write invalidates the point-read keys of the written row and of
//! every row its ranking shift displaced, bumps the goods listing generation
//! and publishes a [`GoodsEvent`].

use std::sync::Arc;

use stockroom_cache::keys;
use stockroom_core::error::CoreError;
use stockroom_core::pagination::Page;
use stockroom_core::ranking;
use stockroom_core::types::DbId;
use stockroom_core::validation::{validate_name, validate_optional_name, ENTITY_GOODS};
use stockroom_db::models::goods::{
    CreateGoods, Goods, GoodsMeta, GoodsPage, RankChange, Removal, UpdateGoods,
};
use stockroom_db::repositories::GoodsRepo;
use stockroom_db::DbPool;
use stockroom_events::{EventBus, GoodsEvent, GoodsEventKind};

use crate::error::{AppError, AppResult};
use crate::metrics::Metrics;
use crate::services::CacheAside;

/// Cache resource label for single goods.
const RESOURCE: &str = "goods";

/// Cache resource label for goods listings.
const RESOURCE_LIST: &str = "goods_list";

#[derive(Clone)]
pub struct GoodsService {
    pool: DbPool,
    cache: CacheAside,
    metrics: Arc<Metrics>,
    event_bus: Arc<EventBus>,
}

impl GoodsService {
    pub fn new(
        pool: DbPool,
        cache: CacheAside,
        metrics: Arc<Metrics>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        Self {
            pool,
            cache,
            metrics,
            event_bus,
        }
    }

    /// Create goods under a project. A missing project is a conflict, not a
    /// not-found: the path names the parent, not the resource.
    pub async fn create(&self, project_id: DbId, input: &CreateGoods) -> AppResult<Goods> {
        validate_name(&input.name)?;
        if let Some(requested) = input.priority {
            ranking::validate_requested(requested)?;
        }

        let change = GoodsRepo::create(&self.pool, project_id, input)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Conflict(format!(
                    "project {project_id} does not exist"
                )))
            })?;

        let goods = self.after_write(GoodsEventKind::Created, change).await;
        tracing::info!(
            goods_id = goods.id,
            project_id,
            priority = goods.priority,
            "Goods created"
        );
        Ok(goods)
    }

    /// Read goods by id, removed rows included.
    ///
    /// Only successful reads are counted, so unknown project ids never create
    /// metric series.
    pub async fn get(&self, id: DbId, project_id: DbId) -> AppResult<Goods> {
        let key = keys::goods(id, project_id);
        if let Some(goods) = self.cache.get::<Goods>(RESOURCE, &key).await {
            self.metrics.goods_read(project_id);
            return Ok(goods);
        }

        let goods = GoodsRepo::find(&self.pool, id, project_id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_GOODS, id))?;
        self.cache.put(&key, &goods).await;
        self.metrics.goods_read(project_id);
        Ok(goods)
    }

    /// One page of active goods across all projects.
    pub async fn list(&self, page: Page) -> AppResult<GoodsPage> {
        let key = self
            .cache
            .generation(keys::GOODS_LIST_GEN)
            .await
            .map(|generation| keys::goods_list(generation, page.limit, page.offset));

        if let Some(key) = &key {
            if let Some(listing) = self.cache.get::<GoodsPage>(RESOURCE_LIST, key).await {
                return Ok(listing);
            }
        }

        let goods = GoodsRepo::list(&self.pool, page.limit, page.offset).await?;
        let counts = GoodsRepo::counts(&self.pool).await?;
        let listing = GoodsPage {
            meta: GoodsMeta {
                total: counts.total,
                removed: counts.removed,
                limit: page.limit,
                offset: page.offset,
            },
            goods,
        };

        if let Some(key) = &key {
            self.cache.put(key, &listing).await;
        }
        Ok(listing)
    }

    /// Patch name and/or description.
    pub async fn update(
        &self,
        id: DbId,
        project_id: DbId,
        input: &UpdateGoods,
    ) -> AppResult<Goods> {
        validate_optional_name(input.name.as_deref())?;

        let goods = GoodsRepo::update(&self.pool, id, project_id, input)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_GOODS, id))?;

        let goods = self
            .after_write(
                GoodsEventKind::Updated,
                RankChange {
                    goods,
                    displaced: Vec::new(),
                },
            )
            .await;
        tracing::info!(goods_id = id, project_id, "Goods updated");
        Ok(goods)
    }

    /// Soft-delete goods. Removing goods that are already removed succeeds
    /// without touching the cache or publishing an event.
    pub async fn remove(&self, id: DbId, project_id: DbId) -> AppResult<Goods> {
        let removal = GoodsRepo::soft_delete(&self.pool, id, project_id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_GOODS, id))?;
        let change = match removal {
            Removal::Removed(change) => change,
            Removal::AlreadyRemoved(goods) => {
                tracing::debug!(goods_id = id, project_id, "Goods already removed");
                return Ok(goods);
            }
        };

        let displaced = change.displaced.len();
        let goods = self.after_write(GoodsEventKind::Removed, change).await;
        tracing::info!(goods_id = id, project_id, displaced, "Goods removed");
        Ok(goods)
    }

    /// Move active goods to a new priority within its project.
    pub async fn reprioritize(
        &self,
        id: DbId,
        project_id: DbId,
        requested: i64,
    ) -> AppResult<Goods> {
        ranking::validate_requested(requested)?;

        let change = GoodsRepo::reprioritize(&self.pool, id, project_id, requested)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_GOODS, id))?;

        let displaced = change.displaced.len();
        let goods = self.after_write(GoodsEventKind::Reprioritized, change).await;
        self.metrics.reprioritizations.inc();

        tracing::info!(
            goods_id = id,
            project_id,
            requested,
            priority = goods.priority,
            displaced,
            "Goods reprioritized"
        );
        Ok(goods)
    }

    /// Cache invalidation and event publication shared by every write.
    async fn after_write(&self, kind: GoodsEventKind, change: RankChange) -> Goods {
        let RankChange { goods, displaced } = change;
        let project_id = goods.project_id;

        let stale = std::iter::once(goods.id)
            .chain(displaced)
            .map(|id| keys::goods(id, project_id));
        self.cache.invalidate(stale).await;
        self.cache.bump_generation(keys::GOODS_LIST_GEN).await;

        self.event_bus.publish(GoodsEvent::new(kind, &goods));
        goods
    }
}
