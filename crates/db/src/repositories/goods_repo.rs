//! Repository for the `goods` table.
//!
//! Writes that change the ranking of a project (create, soft delete,
//! reprioritize) run in one transaction that first locks the owning project
//! row via [`ProjectRepo::lock_for_ranking`], then applies a [`Shift`] planned
//! by [`stockroom_core::ranking`]. Uniqueness of active priorities is checked
//! by the deferred `ex_goods_active_priority` constraint at commit.

use sqlx::{PgConnection, PgPool};
use stockroom_core::ranking::{self, Shift};
use stockroom_core::types::{DbId, Priority};
use stockroom_core::validation::description_or_name;

use crate::models::goods::{CreateGoods, Goods, GoodsCounts, RankChange, Removal, UpdateGoods};
use crate::repositories::ProjectRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, description, priority, removed, created_at";

/// Provides CRUD and ranking operations for goods.
pub struct GoodsRepo;

impl GoodsRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert goods under a project.
    ///
    /// Active goods are inserted at the planned position and every active
    /// item at or below it moves down by one. Goods created already removed
    /// keep the requested priority and displace nothing. An empty description
    /// falls back to the name.
    ///
    /// Returns `None` if the project does not exist.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateGoods,
    ) -> Result<Option<RankChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if ProjectRepo::lock_for_ranking(&mut *tx, project_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let removed = input.removed.unwrap_or(false);
        let (priority, displaced) = if removed {
            (ranking::detached_priority(input.priority), Vec::new())
        } else {
            let active = Self::count_active(&mut *tx, project_id).await?;
            let position = ranking::insert_position(input.priority, active);
            let displaced =
                Self::apply_shift(&mut *tx, project_id, None, &ranking::insert_shift(position))
                    .await?;
            (position, displaced)
        };

        let description = description_or_name(input.description.as_deref(), &input.name);
        let query = format!(
            "INSERT INTO goods (project_id, name, description, priority, removed)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let goods = sqlx::query_as::<_, Goods>(&query)
            .bind(project_id)
            .bind(&input.name)
            .bind(&description)
            .bind(priority)
            .bind(removed)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(RankChange { goods, displaced }))
    }

    /// Find goods by ID within a project. Includes removed rows.
    pub async fn find(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
    ) -> Result<Option<Goods>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM goods WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Goods>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of active goods across all projects, in rank order.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Goods>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM goods
             WHERE NOT removed
             ORDER BY project_id, priority, id
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Goods>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Active goods of one project, in rank order.
    pub async fn list_by_project(pool: &PgPool, project_id: DbId) -> Result<Vec<Goods>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM goods
             WHERE project_id = $1 AND NOT removed
             ORDER BY priority, id"
        );
        sqlx::query_as::<_, Goods>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Count all goods and the removed ones.
    pub async fn counts(pool: &PgPool) -> Result<GoodsCounts, sqlx::Error> {
        sqlx::query_as::<_, GoodsCounts>(
            "SELECT COUNT(*) AS total, COUNT(*) FILTER (WHERE removed) AS removed FROM goods",
        )
        .fetch_one(pool)
        .await
    }

    /// Patch name and/or description. Never touches the priority.
    ///
    /// Returns `None` if no row with the given `id` exists in the project.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        input: &UpdateGoods,
    ) -> Result<Option<Goods>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM goods WHERE id = $1 AND project_id = $2 FOR UPDATE")
                .bind(id)
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let query = format!(
            "UPDATE goods SET
                name = COALESCE($3, name),
                description = COALESCE($4, description)
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let goods = sqlx::query_as::<_, Goods>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&input.name)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(goods))
    }

    /// Mark goods as removed and close the gap it leaves in the ranking.
    ///
    /// Idempotent: removing goods that are already removed succeeds with
    /// [`Removal::AlreadyRemoved`] and leaves the row unchanged. Returns
    /// `None` if no row with the given `id` exists in the project.
    pub async fn soft_delete(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
    ) -> Result<Option<Removal>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if ProjectRepo::lock_for_ranking(&mut *tx, project_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let query = format!(
            "SELECT {COLUMNS} FROM goods WHERE id = $1 AND project_id = $2 FOR UPDATE"
        );
        let Some(current) = sqlx::query_as::<_, Goods>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        if current.removed {
            tx.commit().await?;
            return Ok(Some(Removal::AlreadyRemoved(current)));
        }

        let query = format!(
            "UPDATE goods SET removed = true
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let goods = sqlx::query_as::<_, Goods>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_one(&mut *tx)
            .await?;

        let displaced = Self::apply_shift(
            &mut *tx,
            project_id,
            Some(id),
            &ranking::remove_shift(current.priority),
        )
        .await?;

        tx.commit().await?;
        Ok(Some(Removal::Removed(RankChange { goods, displaced })))
    }

    // ── Ranking ──────────────────────────────────────────────────────

    /// Move active goods to `requested` priority within its project.
    ///
    /// The target is clamped into `[1, n]` where `n` is the number of active
    /// goods in the project. Moving up pushes the items between the target
    /// and the old position down by one; moving down pulls the items between
    /// the old position and the target up by one. Moving to the current
    /// priority changes nothing.
    ///
    /// Returns `None` if the goods do not exist in the project or are removed.
    pub async fn reprioritize(
        pool: &PgPool,
        id: DbId,
        project_id: DbId,
        requested: i64,
    ) -> Result<Option<RankChange>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        if ProjectRepo::lock_for_ranking(&mut *tx, project_id)
            .await?
            .is_none()
        {
            return Ok(None);
        }

        let current: Option<(Priority,)> = sqlx::query_as(
            "SELECT priority FROM goods
             WHERE id = $1 AND project_id = $2 AND NOT removed
             FOR UPDATE",
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some((current,)) = current else {
            return Ok(None);
        };

        let active = Self::count_active(&mut *tx, project_id).await?;
        let target = ranking::move_target(requested, active);

        let displaced = match ranking::move_shift(current, target) {
            Some(shift) => Self::apply_shift(&mut *tx, project_id, Some(id), &shift).await?,
            None => Vec::new(),
        };

        let query = format!(
            "UPDATE goods SET priority = $3
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        let goods = sqlx::query_as::<_, Goods>(&query)
            .bind(id)
            .bind(project_id)
            .bind(target)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            goods_id = id,
            project_id,
            from = current,
            to = target,
            displaced = displaced.len(),
            "Goods reprioritized"
        );
        Ok(Some(RankChange { goods, displaced }))
    }

    /// Number of active goods in a project.
    async fn count_active(conn: &mut PgConnection, project_id: DbId) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM goods WHERE project_id = $1 AND NOT removed")
                .bind(project_id)
                .fetch_one(conn)
                .await?;
        Ok(count)
    }

    /// Apply `shift` to the active goods of a project, skipping `exclude`.
    ///
    /// Returns the IDs of the rows that moved.
    async fn apply_shift(
        conn: &mut PgConnection,
        project_id: DbId,
        exclude: Option<DbId>,
        shift: &Shift,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "UPDATE goods SET priority = priority + $2
             WHERE project_id = $1
               AND NOT removed
               AND ($3::BIGINT IS NULL OR id <> $3)
               AND priority >= $4
               AND ($5::INTEGER IS NULL OR priority <= $5)
             RETURNING id",
        )
        .bind(project_id)
        .bind(shift.delta)
        .bind(exclude)
        .bind(shift.from)
        .bind(shift.to)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
