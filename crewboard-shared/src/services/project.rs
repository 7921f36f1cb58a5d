/// Project lifecycle
///
/// Creation writes the project and its owner membership in one store
/// transaction, so a project without exactly one owner is never visible.
/// Reads need any membership; updates and deletes need edit rights.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::directory::MembershipDirectory;
use super::require_access;
use crate::auth::authorization::ProjectAction;
use crate::error::{CoreError, CoreResult};
use crate::models::membership::{Membership, ProjectRole};
use crate::models::project::{CreateProject, Project, ProjectChanges};
use crate::store::{Store, StoreError, StoreTransaction};

/// Project CRUD gated by membership
#[derive(Clone)]
pub struct ProjectService {
    store: Arc<dyn Store>,
    directory: MembershipDirectory,
    per_page: i64,
}

impl ProjectService {
    /// `per_page` below 1 is raised to 1
    pub fn new(store: Arc<dyn Store>, directory: MembershipDirectory, per_page: i64) -> Self {
        Self {
            store,
            directory,
            per_page: per_page.max(1),
        }
    }

    /// Page size used by [`ProjectService::get_for_user`]
    pub fn per_page(&self) -> i64 {
        self.per_page
    }

    /// Creates a project owned by `owner_id`
    ///
    /// The project row and the owner membership are committed together; on
    /// any failure both are rolled back.
    pub async fn create(&self, owner_id: Uuid, data: CreateProject) -> CoreResult<Project> {
        let project = Project::new(owner_id, data);
        let mut tx = self.store.begin().await?;

        match insert_with_owner(tx.as_mut(), &project).await {
            Ok(created) => {
                tx.commit().await?;
                info!(
                    project_id = %created.id,
                    owner_id = %owner_id,
                    "Project created"
                );
                Ok(created)
            }
            Err(e) => {
                error!(
                    project_id = %project.id,
                    owner_id = %owner_id,
                    error = %e,
                    "Project creation failed, rolling back"
                );
                if let Err(rollback_err) = tx.rollback().await {
                    error!(error = %rollback_err, "Rollback failed");
                }
                Err(e.into())
            }
        }
    }

    /// One page of the projects `user_id` belongs to, oldest first
    ///
    /// `page` is zero-based; negative values are treated as zero.
    pub async fn get_for_user(&self, user_id: Uuid, page: i64) -> CoreResult<Vec<Project>> {
        let page = page.max(0);
        let offset = page.saturating_mul(self.per_page);

        let projects = self
            .store
            .list_projects_for_member(user_id, self.per_page, offset)
            .await?;

        debug!(
            user_id = %user_id,
            page,
            count = projects.len(),
            "Listed projects for user"
        );
        Ok(projects)
    }

    /// Fetches a project the requester belongs to
    ///
    /// `NotFound` when the project does not exist, `Forbidden` when it does
    /// but the requester is not a member.
    pub async fn get_by_id(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<Project> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            user_id,
            ProjectAction::View,
        )
        .await?;

        self.store
            .find_project(project_id)
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Project {project_id} not found")))
    }

    /// Replaces name, description and end date
    pub async fn update(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        changes: ProjectChanges,
    ) -> CoreResult<Project> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::UpdateProject,
        )
        .await?;

        let project = self
            .store
            .update_project(project_id, &changes, Utc::now())
            .await?
            .ok_or_else(|| CoreError::NotFound(format!("Project {project_id} not found")))?;

        info!(project_id = %project_id, actor_id = %actor_id, "Project updated");
        Ok(project)
    }

    /// Deletes a project together with its memberships and tasks
    pub async fn delete(&self, project_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::DeleteProject,
        )
        .await?;

        if !self.store.delete_project(project_id).await? {
            return Err(CoreError::NotFound(format!("Project {project_id} not found")));
        }

        info!(project_id = %project_id, actor_id = %actor_id, "Project deleted");
        Ok(())
    }
}

async fn insert_with_owner(
    tx: &mut dyn StoreTransaction,
    project: &Project,
) -> Result<Project, StoreError> {
    let created = tx.insert_project(project).await?;
    tx.insert_membership(&Membership::new(
        created.id,
        created.owner_id,
        ProjectRole::Owner,
    ))
    .await?;
    Ok(created)
}
