//! Durable event persistence service.
//!
//! [`EventPersistence`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! and appends every received [`GoodsEvent`] to the `goods_events` table. It
//! runs as a long-lived background task and stops when the bus is dropped.

use stockroom_core::types::DbId;
use stockroom_db::models::goods_event::NewGoodsEvent;
use stockroom_db::repositories::GoodsEventRepo;
use stockroom_db::DbPool;
use tokio::sync::broadcast;

use crate::bus::GoodsEvent;

/// Background service that persists goods events to the database.
pub struct EventPersistence;

impl EventPersistence {
    /// Run the persistence loop until the channel closes.
    ///
    /// A failed insert is logged and skipped; it never stops the loop.
    pub async fn run(pool: DbPool, mut receiver: broadcast::Receiver<GoodsEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = Self::persist(&pool, &event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.kind,
                            goods_id = event.goods_id,
                            "Failed to persist goods event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Event persistence lagged, some events were not persisted"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, persistence shutting down");
                    break;
                }
            }
        }
    }

    /// Write a single event to the `goods_events` table.
    pub async fn persist(pool: &DbPool, event: &GoodsEvent) -> Result<DbId, sqlx::Error> {
        GoodsEventRepo::insert(
            pool,
            &NewGoodsEvent {
                goods_id: event.goods_id,
                project_id: event.project_id,
                event_type: event.kind.as_str(),
                name: &event.name,
                description: &event.description,
                priority: event.priority,
                removed: event.removed,
                created_at: event.timestamp,
            },
        )
        .await
    }
}
