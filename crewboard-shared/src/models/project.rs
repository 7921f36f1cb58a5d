/// Project model
///
/// Projects are the tenancy boundary of Crewboard. A project exclusively owns
/// its memberships and tasks: deleting it removes both.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY,
///     name VARCHAR(255) NOT NULL,
///     description TEXT NOT NULL DEFAULT '',
///     start_date TIMESTAMPTZ NOT NULL,
///     end_date TIMESTAMPTZ NOT NULL,
///     owner_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Project row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project name
    pub name: String,

    /// Free-form description
    pub description: String,

    /// Planned start, immutable after creation
    pub start_date: DateTime<Utc>,

    /// Planned end
    pub end_date: DateTime<Utc>,

    /// User who created the project, immutable after creation
    pub owner_id: Uuid,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProject {
    /// Project name
    pub name: String,

    /// Description (may be empty)
    #[serde(default)]
    pub description: String,

    /// Planned start
    pub start_date: DateTime<Utc>,

    /// Planned end
    pub end_date: DateTime<Utc>,
}

/// Mutable project fields
///
/// Start date and owner are deliberately absent: they never change after
/// creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectChanges {
    /// New name
    pub name: String,

    /// New description
    pub description: String,

    /// New planned end
    pub end_date: DateTime<Utc>,
}

impl Project {
    /// Builds a fresh project row owned by `owner_id`
    pub fn new(owner_id: Uuid, data: CreateProject) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: data.name,
            description: data.description,
            start_date: data.start_date,
            end_date: data.end_date,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Applies mutable fields and stamps `updated_at`
    pub fn apply(&mut self, changes: &ProjectChanges, updated_at: DateTime<Utc>) {
        self.name = changes.name.clone();
        self.description = changes.description.clone();
        self.end_date = changes.end_date;
        self.updated_at = updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn sample() -> CreateProject {
        let start = Utc::now();
        CreateProject {
            name: "Launch".to_string(),
            description: "Q3 launch plan".to_string(),
            start_date: start,
            end_date: start + Duration::days(30),
        }
    }

    #[test]
    fn test_new_project_sets_owner_and_timestamps() {
        let owner = Uuid::new_v4();
        let project = Project::new(owner, sample());

        assert_eq!(project.owner_id, owner);
        assert_eq!(project.name, "Launch");
        assert_eq!(project.created_at, project.updated_at);
    }

    #[test]
    fn test_apply_keeps_immutable_fields() {
        let owner = Uuid::new_v4();
        let mut project = Project::new(owner, sample());
        let start = project.start_date;
        let id = project.id;
        let later = project.updated_at + Duration::minutes(5);

        project.apply(
            &ProjectChanges {
                name: "Relaunch".to_string(),
                description: String::new(),
                end_date: start + Duration::days(60),
            },
            later,
        );

        assert_eq!(project.id, id);
        assert_eq!(project.owner_id, owner);
        assert_eq!(project.start_date, start);
        assert_eq!(project.name, "Relaunch");
        assert_eq!(project.end_date, start + Duration::days(60));
        assert_eq!(project.updated_at, later);
    }
}
