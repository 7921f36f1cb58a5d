/// Membership directory
///
/// Source of truth for who belongs to which project and with which role.
/// The directory only looks memberships up and mutates them; permission
/// decisions belong to [`crate::auth::authorization`].

use std::sync::Arc;

use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::models::membership::{Membership, ProjectRole};
use crate::store::Store;

/// Lookup and mutation surface over project memberships
#[derive(Clone)]
pub struct MembershipDirectory {
    store: Arc<dyn Store>,
}

impl MembershipDirectory {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Membership of `user_id` in `project_id`, if any
    pub async fn find(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<Option<Membership>> {
        Ok(self.store.find_membership(project_id, user_id).await?)
    }

    /// Membership of `user_id` in `project_id`; `NotFound` when absent
    pub async fn get(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<Membership> {
        self.find(project_id, user_id).await?.ok_or_else(|| {
            CoreError::NotFound(format!(
                "User {user_id} is not a member of project {project_id}"
            ))
        })
    }

    /// All memberships of a project in join order
    pub async fn list(&self, project_id: Uuid) -> CoreResult<Vec<Membership>> {
        Ok(self.store.list_memberships(project_id).await?)
    }

    /// Inserts a membership
    ///
    /// An existing `(project_id, user_id)` pair yields `Conflict`, whatever
    /// the requested role.
    pub async fn create(
        &self,
        project_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> CoreResult<Membership> {
        let membership = self
            .store
            .insert_membership(&Membership::new(project_id, user_id, role))
            .await?;

        info!(
            project_id = %project_id,
            user_id = %user_id,
            role = %role,
            "Membership created"
        );
        Ok(membership)
    }

    /// Removes a membership; `NotFound` when it does not exist
    pub async fn delete(&self, project_id: Uuid, user_id: Uuid) -> CoreResult<()> {
        if !self.store.delete_membership(project_id, user_id).await? {
            debug!(project_id = %project_id, user_id = %user_id, "No membership to delete");
            return Err(CoreError::NotFound(format!(
                "User {user_id} is not a member of project {project_id}"
            )));
        }

        info!(project_id = %project_id, user_id = %user_id, "Membership deleted");
        Ok(())
    }
}
