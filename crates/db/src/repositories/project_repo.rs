//! Repository for the `projects` table.

use sqlx::{PgConnection, PgPool};
use stockroom_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, created_at";

/// Provides CRUD operations for projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateProject) -> Result<Project, sqlx::Error> {
        let query = format!("INSERT INTO projects (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Project>(&query)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List one page of projects ordered by ID.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects ORDER BY id LIMIT $1 OFFSET $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total number of projects.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM projects")
            .fetch_one(pool)
            .await?;
        Ok(total)
    }

    /// Update a project. Only non-`None` fields in `input` are applied.
    ///
    /// The row is locked before the patch so a concurrent delete cannot slip
    /// in between the existence check and the update. `NO KEY UPDATE` keeps
    /// foreign key checks from goods inserts unblocked. Returns `None` if no
    /// row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let query = format!(
            "UPDATE projects SET name = COALESCE($2, name)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(&input.name)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(project))
    }

    /// Permanently delete a project together with all of its goods.
    ///
    /// Returns the IDs of the deleted goods, or `None` if the project does not
    /// exist.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<DbId>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let goods_ids: Vec<(DbId,)> =
            sqlx::query_as("DELETE FROM goods WHERE project_id = $1 RETURNING id")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(goods_ids.into_iter().map(|(id,)| id).collect()))
    }

    /// Lock a project row for the rest of the caller's transaction.
    ///
    /// Every write that changes the ranking of a project's goods takes this
    /// lock first, so such writes are serialized per project while writes to
    /// other projects proceed independently. `NO KEY UPDATE` leaves foreign
    /// key checks from goods inserts unblocked. Returns `None` if the project
    /// does not exist.
    pub async fn lock_for_ranking(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        Ok(row.map(|(id,)| id))
    }
}
