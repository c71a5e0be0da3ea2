//! Goods entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use stockroom_core::types::{DbId, Priority, Timestamp};

/// A goods row from the `goods` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct Goods {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub description: String,
    pub priority: Priority,
    pub removed: bool,
    pub created_at: Timestamp,
}

/// DTO for creating goods under a project.
///
/// A missing `name` deserializes to an empty string so it is reported as a
/// validation failure rather than a body-parsing one.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGoods {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    /// Requested rank. Appends after the last active item when omitted.
    pub priority: Option<i64>,
    /// Defaults to `false`.
    pub removed: Option<bool>,
}

/// DTO for patching goods. Priority is changed only by reprioritization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateGoods {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Result of a rank-changing write: the written row plus the ids of the
/// other goods whose priority moved as a side effect.
#[derive(Debug, Clone)]
pub struct RankChange {
    pub goods: Goods,
    pub displaced: Vec<DbId>,
}

/// Outcome of a soft delete.
#[derive(Debug, Clone)]
pub enum Removal {
    /// The goods were active and are now removed; the ranking closed up.
    Removed(RankChange),
    /// The goods were already removed. Nothing changed.
    AlreadyRemoved(Goods),
}

impl Removal {
    pub fn goods(&self) -> &Goods {
        match self {
            Removal::Removed(change) => &change.goods,
            Removal::AlreadyRemoved(goods) => goods,
        }
    }
}

/// Row counts backing the listing metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, FromRow)]
pub struct GoodsCounts {
    /// Every goods row, removed or not.
    pub total: i64,
    /// Rows with `removed = true`.
    pub removed: i64,
}

/// Pagination metadata of a goods listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsMeta {
    pub total: i64,
    pub removed: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response body of `GET /api/goods/list`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoodsPage {
    pub meta: GoodsMeta,
    pub goods: Vec<Goods>,
}
