/// Project authorization policy
///
/// Permissions are a pure function of the actor's [`ProjectRole`]. Holding
/// any membership grants read access and task create/update; editing the
/// project, managing members and deleting tasks need edit rights, which only
/// owners and admins have.
///
/// Roles never change after a membership is created, so a decision only
/// depends on the membership looked up for the current request.
///
/// # Example
///
/// ```
/// use crewboard_shared::auth::authorization::{authorize, can_edit_project, ProjectAction};
/// use crewboard_shared::models::membership::{Membership, ProjectRole};
/// use uuid::Uuid;
///
/// assert!(can_edit_project(ProjectRole::Admin));
/// assert!(!can_edit_project(ProjectRole::Member));
///
/// let project_id = Uuid::new_v4();
/// let membership = Membership::new(project_id, Uuid::new_v4(), ProjectRole::Member);
/// assert!(authorize(Some(membership.clone()), project_id, ProjectAction::UpdateTask).is_ok());
/// assert!(authorize(Some(membership), project_id, ProjectAction::DeleteTask).is_err());
/// assert!(authorize(None, project_id, ProjectAction::View).is_err());
/// ```

use uuid::Uuid;

use crate::models::membership::{Membership, ProjectRole};

/// Error type for authorization checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
    /// Actor has no membership in the project
    #[error("Not a member of project {0}")]
    NotMember(Uuid),

    /// Actor's role does not allow the action
    #[error("Role {role} may not {action}")]
    InsufficientRole {
        role: ProjectRole,
        action: ProjectAction,
    },
}

/// Operations gated by the policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectAction {
    /// Read the project, its members or its tasks
    View,
    UpdateProject,
    DeleteProject,
    AddMember,
    RemoveMember,
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl ProjectAction {
    /// Whether the action needs edit rights on top of membership
    pub fn requires_edit(&self) -> bool {
        match self {
            ProjectAction::View | ProjectAction::CreateTask | ProjectAction::UpdateTask => false,
            ProjectAction::UpdateProject
            | ProjectAction::DeleteProject
            | ProjectAction::AddMember
            | ProjectAction::RemoveMember
            | ProjectAction::DeleteTask => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectAction::View => "view project",
            ProjectAction::UpdateProject => "update project",
            ProjectAction::DeleteProject => "delete project",
            ProjectAction::AddMember => "add member",
            ProjectAction::RemoveMember => "remove member",
            ProjectAction::CreateTask => "create task",
            ProjectAction::UpdateTask => "update task",
            ProjectAction::DeleteTask => "delete task",
        }
    }
}

impl std::fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Owners and admins may edit a project
pub fn can_edit_project(role: ProjectRole) -> bool {
    matches!(role, ProjectRole::Owner | ProjectRole::Admin)
}

/// Whether `role` may perform `action`
pub fn is_allowed(role: ProjectRole, action: ProjectAction) -> bool {
    !action.requires_edit() || can_edit_project(role)
}

/// Applies the policy to the actor's membership, if any
///
/// Hands the membership back when the action is allowed.
pub fn authorize(
    membership: Option<Membership>,
    project_id: Uuid,
    action: ProjectAction,
) -> Result<Membership, AuthzError> {
    let membership = membership.ok_or(AuthzError::NotMember(project_id))?;

    if !is_allowed(membership.role, action) {
        return Err(AuthzError::InsufficientRole {
            role: membership.role,
            action,
        });
    }

    Ok(membership)
}
