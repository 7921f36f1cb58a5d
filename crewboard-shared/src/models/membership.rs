/// Membership model: a user's role within a project
///
/// A membership is the join record between a user and a project. The pair
/// `(project_id, user_id)` is unique and every project carries exactly one
/// membership with the `owner` role, created together with the project.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE project_role AS ENUM ('owner', 'admin', 'member');
///
/// CREATE TABLE project_members (
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     role project_role NOT NULL DEFAULT 'member',
///     joined_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (project_id, user_id)
/// );
/// ```
///
/// # Roles
///
/// - **owner**: Creator of the project, exactly one per project
/// - **admin**: Can edit the project, manage members and delete tasks
/// - **member**: Can read the project and create/update tasks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role a user holds within a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "project_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    /// Project creator
    Owner,

    /// Co-manager of the project
    Admin,

    /// Regular participant
    Member,
}

impl ProjectRole {
    /// Every role, in descending order of privilege
    pub const ALL: [ProjectRole; 3] = [ProjectRole::Owner, ProjectRole::Admin, ProjectRole::Member];

    /// Converts role to its stored string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectRole::Owner => "owner",
            ProjectRole::Admin => "admin",
            ProjectRole::Member => "member",
        }
    }
}

impl std::fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's membership in a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Membership {
    /// Project ID
    pub project_id: Uuid,

    /// User ID
    pub user_id: Uuid,

    /// Role within the project
    pub role: ProjectRole,

    /// When the user joined the project
    pub joined_at: DateTime<Utc>,
}

impl Membership {
    /// Builds a new membership row joined now
    pub fn new(project_id: Uuid, user_id: Uuid, role: ProjectRole) -> Self {
        Self {
            project_id,
            user_id,
            role,
            joined_at: Utc::now(),
        }
    }

    /// Whether this is the project's owner membership
    pub fn is_owner(&self) -> bool {
        self.role == ProjectRole::Owner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_role_as_str() {
        assert_eq!(ProjectRole::Owner.as_str(), "owner");
        assert_eq!(ProjectRole::Admin.as_str(), "admin");
        assert_eq!(ProjectRole::Member.as_str(), "member");
    }

    #[test]
    fn test_project_role_serde_lowercase() {
        let json = serde_json::to_string(&ProjectRole::Admin).unwrap();
        assert_eq!(json, "\"admin\"");

        let role: ProjectRole = serde_json::from_str("\"member\"").unwrap();
        assert_eq!(role, ProjectRole::Member);

        assert!(serde_json::from_str::<ProjectRole>("\"viewer\"").is_err());
    }

    #[test]
    fn test_new_membership() {
        let project_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let membership = Membership::new(project_id, user_id, ProjectRole::Owner);

        assert_eq!(membership.project_id, project_id);
        assert_eq!(membership.user_id, user_id);
        assert!(membership.is_owner());
        assert!(!Membership::new(project_id, user_id, ProjectRole::Admin).is_owner());
    }
}
