/// Request payload validation
///
/// Field rules are declared on the request types with `validator` derives.
/// [`PayloadValidator`] runs them, turns failures into 422 responses and
/// resolves role names through the [`RoleTable`] it was built with.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use crewboard_shared::models::membership::ProjectRole;
use validator::Validate;

use crate::error::{ApiError, ValidationErrorDetail};

/// Accepted role names
#[derive(Debug, Clone)]
pub struct RoleTable {
    roles: HashMap<String, ProjectRole>,
}

impl RoleTable {
    /// Every [`ProjectRole`] under its lowercase name
    pub fn standard() -> Self {
        Self::from_roles(ProjectRole::ALL)
    }

    pub fn from_roles(roles: impl IntoIterator<Item = ProjectRole>) -> Self {
        Self {
            roles: roles
                .into_iter()
                .map(|role| (role.as_str().to_string(), role))
                .collect(),
        }
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<ProjectRole> {
        self.roles.get(&name.trim().to_lowercase()).copied()
    }

    /// Sorted role names, for error messages
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.roles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RoleTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Validates request payloads
#[derive(Debug, Clone)]
pub struct PayloadValidator {
    roles: RoleTable,
}

impl PayloadValidator {
    pub fn new(roles: RoleTable) -> Self {
        Self { roles }
    }

    /// Runs the derived field rules
    pub fn check<T: Validate>(&self, payload: &T) -> Result<(), ApiError> {
        payload.validate().map_err(|e| {
            let mut errors: Vec<ValidationErrorDetail> = e
                .field_errors()
                .iter()
                .flat_map(|(field, errors)| {
                    errors.iter().map(move |error| ValidationErrorDetail {
                        field: field.to_string(),
                        message: error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| "Validation failed".to_string()),
                    })
                })
                .collect();
            errors.sort_by(|a, b| a.field.cmp(&b.field));
            ApiError::ValidationError(errors)
        })
    }

    /// Resolves a role name
    pub fn role(&self, field: &str, name: &str) -> Result<ProjectRole, ApiError> {
        self.roles.lookup(name).ok_or_else(|| {
            ApiError::ValidationError(vec![ValidationErrorDetail::new(
                field,
                format!("Unknown role, expected one of: {}", self.roles.names().join(", ")),
            )])
        })
    }

    /// Rejects ranges that end before they start
    pub fn date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<(), ApiError> {
        if end < start {
            return Err(ApiError::ValidationError(vec![ValidationErrorDetail::new(
                "end_date",
                "End date must not be before start date",
            )]));
        }
        Ok(())
    }
}

impl Default for PayloadValidator {
    fn default() -> Self {
        Self::new(RoleTable::standard())
    }
}
