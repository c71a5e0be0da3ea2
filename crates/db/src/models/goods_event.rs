//! Goods audit-log rows.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Priority, Timestamp};

/// A row from the append-only `goods_events` table.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct GoodsEventRow {
    pub id: DbId,
    pub goods_id: DbId,
    pub project_id: DbId,
    pub event_type: String,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub removed: bool,
    pub created_at: Timestamp,
}

/// DTO for appending an event.
#[derive(Debug, Clone)]
pub struct NewGoodsEvent<'a> {
    pub goods_id: DbId,
    pub project_id: DbId,
    pub event_type: &'a str,
    pub name: &'a str,
    pub description: &'a str,
    pub priority: Priority,
    pub removed: bool,
    pub created_at: Timestamp,
}
