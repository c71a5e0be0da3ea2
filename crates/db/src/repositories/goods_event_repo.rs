//! Repository for the append-only `goods_events` table.

use sqlx::PgPool;
use stockroom_core::types::DbId;

use crate::models::goods_event::{GoodsEventRow, NewGoodsEvent};

/// Column list for `goods_events` queries.
const COLUMNS: &str =
    "id, goods_id, project_id, event_type, name, description, priority, removed, created_at";

/// Provides write and read operations for the goods audit log.
pub struct GoodsEventRepo;

impl GoodsEventRepo {
    /// Append an event row, returning the generated ID.
    pub async fn insert(pool: &PgPool, event: &NewGoodsEvent<'_>) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO goods_events \
                (goods_id, project_id, event_type, name, description, priority, removed, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING id",
        )
        .bind(event.goods_id)
        .bind(event.project_id)
        .bind(event.event_type)
        .bind(event.name)
        .bind(event.description)
        .bind(event.priority)
        .bind(event.removed)
        .bind(event.created_at)
        .fetch_one(pool)
        .await
    }

    /// All events recorded for one goods row, oldest first.
    pub async fn list_for_goods(
        pool: &PgPool,
        goods_id: DbId,
    ) -> Result<Vec<GoodsEventRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM goods_events WHERE goods_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, GoodsEventRow>(&query)
            .bind(goods_id)
            .fetch_all(pool)
            .await
    }
}
