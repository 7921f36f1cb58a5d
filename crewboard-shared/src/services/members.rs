/// Member management
///
/// Adds, lists and removes the members of a project. Adding and removing
/// need edit rights; listing needs any membership. The owner membership is
/// created with the project and can neither be added nor removed here.

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use super::directory::MembershipDirectory;
use super::require_access;
use crate::auth::authorization::ProjectAction;
use crate::error::{CoreError, CoreResult};
use crate::models::membership::{Membership, ProjectRole};
use crate::store::Store;

#[derive(Clone)]
pub struct MemberService {
    store: Arc<dyn Store>,
    directory: MembershipDirectory,
}

impl MemberService {
    pub fn new(store: Arc<dyn Store>, directory: MembershipDirectory) -> Self {
        Self { store, directory }
    }

    /// Adds `user_id` to the project with `role`
    ///
    /// `Conflict` when the user is already a member or `role` is owner,
    /// `NotFound` when the user does not exist.
    pub async fn add(
        &self,
        project_id: Uuid,
        actor_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> CoreResult<Membership> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::AddMember,
        )
        .await?;

        if role == ProjectRole::Owner {
            warn!(project_id = %project_id, user_id = %user_id, "Rejected second owner");
            return Err(CoreError::Conflict(format!(
                "Project {project_id} already has an owner"
            )));
        }

        if self.store.find_user_by_id(user_id).await?.is_none() {
            return Err(CoreError::NotFound(format!("User {user_id} not found")));
        }

        let membership = self.directory.create(project_id, user_id, role).await?;
        info!(
            project_id = %project_id,
            actor_id = %actor_id,
            user_id = %user_id,
            "Member added"
        );
        Ok(membership)
    }

    /// Members of a project in join order
    pub async fn list(&self, project_id: Uuid, actor_id: Uuid) -> CoreResult<Vec<Membership>> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::View,
        )
        .await?;
        self.directory.list(project_id).await
    }

    /// Removes `user_id` from the project
    ///
    /// Actors can never remove themselves, and the owner membership is never
    /// removed while the project exists.
    pub async fn remove(&self, project_id: Uuid, actor_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::RemoveMember,
        )
        .await?;

        if actor_id == user_id {
            warn!(project_id = %project_id, actor_id = %actor_id, "Rejected self-removal");
            return Err(CoreError::Forbidden(
                "Members cannot remove themselves".to_string(),
            ));
        }

        let target = self.directory.get(project_id, user_id).await?;
        if target.is_owner() {
            warn!(project_id = %project_id, user_id = %user_id, "Rejected owner removal");
            return Err(CoreError::Forbidden(
                "The project owner cannot be removed".to_string(),
            ));
        }

        self.directory.delete(project_id, user_id).await?;
        info!(
            project_id = %project_id,
            actor_id = %actor_id,
            user_id = %user_id,
            "Member removed"
        );
        Ok(())
    }
}
