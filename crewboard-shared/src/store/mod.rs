/// Persistence boundary
///
/// The core services never talk to a database directly. They depend on the
/// [`Store`] trait, which bundles per-entity CRUD ports plus a single
/// transactional primitive, [`UnitOfWork::begin`], used by project creation.
///
/// # Implementations
///
/// - [`postgres::PgStore`]: PostgreSQL via sqlx (production)
/// - [`memory::InMemoryStore`]: process-local store with fault injection
///   (tests and local runs)
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use crewboard_shared::store::{memory::InMemoryStore, Store};
///
/// # async fn example() -> Result<(), crewboard_shared::store::StoreError> {
/// let store: Arc<dyn Store> = Arc::new(InMemoryStore::new());
/// store.ping().await?;
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::{
    membership::Membership,
    project::{Project, ProjectChanges},
    task::{Task, TaskChanges},
    user::User,
};

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors returned by store implementations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    /// A referenced row does not exist
    #[error("Foreign key violated: {0}")]
    ForeignKeyViolation(String),

    /// Database driver failure
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Non-database backend failure (e.g. injected fault)
    #[error("Storage backend failure: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            let constraint = db_err.constraint().unwrap_or("unknown").to_string();
            match db_err.kind() {
                sqlx::error::ErrorKind::UniqueViolation => {
                    return StoreError::UniqueViolation(constraint)
                }
                sqlx::error::ErrorKind::ForeignKeyViolation => {
                    return StoreError::ForeignKeyViolation(constraint)
                }
                _ => {}
            }
        }
        StoreError::Database(err)
    }
}

/// User persistence
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts a user; `UniqueViolation` when the email is taken
    async fn insert_user(&self, user: &User) -> StoreResult<User>;

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
}

/// Project persistence (creation goes through [`UnitOfWork`])
#[async_trait]
pub trait ProjectStore: Send + Sync {
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>>;

    /// Projects in which `user_id` holds any membership, oldest first
    async fn list_projects_for_member(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Project>>;

    /// Applies mutable fields; `None` when the project does not exist
    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Project>>;

    /// Deletes a project together with its memberships and tasks
    ///
    /// Returns false if the project did not exist.
    async fn delete_project(&self, id: Uuid) -> StoreResult<bool>;
}

/// Membership persistence
#[async_trait]
pub trait MembershipStore: Send + Sync {
    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>>;

    /// Memberships of a project in join order
    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<Membership>>;

    /// Inserts a membership
    ///
    /// `UniqueViolation` when the pair already exists, `ForeignKeyViolation`
    /// when the project or user is missing.
    async fn insert_membership(&self, membership: &Membership) -> StoreResult<Membership>;

    /// Returns false if no such membership existed
    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool>;
}

/// Task persistence
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task>;

    async fn find_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<Option<Task>>;

    /// Tasks of a project, optionally restricted to one assignee
    async fn list_tasks(&self, project_id: Uuid, assignee: Option<Uuid>)
        -> StoreResult<Vec<Task>>;

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>>;

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<bool>;
}

/// Transactional primitive
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Opens a transaction; dropping it without commit rolls back
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>>;

    /// Verifies the backend is reachable
    async fn ping(&self) -> StoreResult<()>;
}

/// Writes staged inside a transaction
///
/// Nothing written here is visible to other operations until
/// [`StoreTransaction::commit`] succeeds.
#[async_trait]
pub trait StoreTransaction: Send {
    async fn insert_project(&mut self, project: &Project) -> StoreResult<Project>;

    async fn insert_membership(&mut self, membership: &Membership) -> StoreResult<Membership>;

    async fn commit(self: Box<Self>) -> StoreResult<()>;

    async fn rollback(self: Box<Self>) -> StoreResult<()>;
}

/// Full persistence surface consumed by the services
pub trait Store: UserStore + ProjectStore + MembershipStore + TaskStore + UnitOfWork {}

impl<T> Store for T where T: UserStore + ProjectStore + MembershipStore + TaskStore + UnitOfWork {}
