//! Project operations.

use stockroom_cache::keys;
use stockroom_core::pagination::Page;
use stockroom_core::types::DbId;
use stockroom_core::validation::{validate_name, validate_optional_name, ENTITY_PROJECT};
use stockroom_db::models::project::{
    CreateProject, Project, ProjectPage, ProjectsMeta, UpdateProject,
};
use stockroom_db::repositories::ProjectRepo;
use stockroom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::services::CacheAside;

/// Cache resource label for single projects.
const RESOURCE: &str = "project";

/// Cache resource label for project listings.
const RESOURCE_LIST: &str = "projects_list";

#[derive(Clone)]
pub struct ProjectService {
    pool: DbPool,
    cache: CacheAside,
}

impl ProjectService {
    pub fn new(pool: DbPool, cache: CacheAside) -> Self {
        Self { pool, cache }
    }

    pub async fn create(&self, input: &CreateProject) -> AppResult<Project> {
        validate_name(&input.name)?;

        let project = ProjectRepo::create(&self.pool, input).await?;
        self.cache.bump_generation(keys::PROJECTS_LIST_GEN).await;

        tracing::info!(project_id = project.id, "Project created");
        Ok(project)
    }

    pub async fn get(&self, id: DbId) -> AppResult<Project> {
        let key = keys::project(id);
        if let Some(project) = self.cache.get::<Project>(RESOURCE, &key).await {
            return Ok(project);
        }

        let project = ProjectRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_PROJECT, id))?;
        self.cache.put(&key, &project).await;
        Ok(project)
    }

    pub async fn list(&self, page: Page) -> AppResult<ProjectPage> {
        let key = self
            .cache
            .generation(keys::PROJECTS_LIST_GEN)
            .await
            .map(|generation| keys::projects_list(generation, page.limit, page.offset));

        if let Some(key) = &key {
            if let Some(listing) = self.cache.get::<ProjectPage>(RESOURCE_LIST, key).await {
                return Ok(listing);
            }
        }

        let projects = ProjectRepo::list(&self.pool, page.limit, page.offset).await?;
        let total = ProjectRepo::count(&self.pool).await?;
        let listing = ProjectPage {
            meta: ProjectsMeta {
                total,
                limit: page.limit,
                offset: page.offset,
            },
            projects,
        };

        if let Some(key) = &key {
            self.cache.put(key, &listing).await;
        }
        Ok(listing)
    }

    pub async fn update(&self, id: DbId, input: &UpdateProject) -> AppResult<Project> {
        validate_optional_name(input.name.as_deref())?;

        let project = ProjectRepo::update(&self.pool, id, input)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_PROJECT, id))?;

        self.cache.invalidate([keys::project(id)]).await;
        self.cache.bump_generation(keys::PROJECTS_LIST_GEN).await;

        tracing::info!(project_id = id, "Project updated");
        Ok(project)
    }

    /// Hard-delete a project and all of its goods.
    pub async fn delete(&self, id: DbId) -> AppResult<()> {
        let goods_ids = ProjectRepo::delete(&self.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found(ENTITY_PROJECT, id))?;

        let stale = std::iter::once(keys::project(id))
            .chain(goods_ids.iter().copied().map(|goods_id| keys::goods(goods_id, id)));
        self.cache.invalidate(stale).await;
        self.cache.bump_generation(keys::PROJECTS_LIST_GEN).await;
        self.cache.bump_generation(keys::GOODS_LIST_GEN).await;

        tracing::info!(project_id = id, goods = goods_ids.len(), "Project deleted");
        Ok(())
    }
}
