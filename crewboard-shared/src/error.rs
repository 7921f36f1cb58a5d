/// Errors returned by the core services
///
/// Every project, membership and task operation returns [`CoreResult`].
/// `NotFound` and `Forbidden` are raised at the decision site; persistence
/// errors are translated by the `From<StoreError>` impl so that constraint
/// violations surface as domain outcomes instead of database failures.

use crate::auth::authorization::AuthzError;
use crate::store::StoreError;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Core error
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// Persistence failure, passed through unchanged
    #[error("Unexpected storage error: {0}")]
    Unexpected(StoreError),
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(constraint) => {
                CoreError::Conflict(format!("Record already exists ({constraint})"))
            }
            StoreError::ForeignKeyViolation(constraint) => {
                CoreError::NotFound(format!("Referenced record does not exist ({constraint})"))
            }
            other => CoreError::Unexpected(other),
        }
    }
}

impl From<AuthzError> for CoreError {
    fn from(err: AuthzError) -> Self {
        CoreError::Forbidden(err.to_string())
    }
}
