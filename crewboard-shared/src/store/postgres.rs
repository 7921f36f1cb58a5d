/// PostgreSQL store backed by a sqlx connection pool
///
/// Every method is a single statement except project creation, which the
/// services run through [`PgTransaction`]. Cascading deletes and the
/// `(project_id, user_id)` uniqueness of memberships are enforced by the
/// schema in `migrations/`.
///
/// # Example
///
/// ```no_run
/// use crewboard_shared::db::pool::{create_pool, DatabaseConfig};
/// use crewboard_shared::store::postgres::PgStore;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig {
///     url: std::env::var("DATABASE_URL")?,
///     ..Default::default()
/// })
/// .await?;
/// let store = PgStore::new(pool);
/// # Ok(())
/// # }
/// ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::debug;
use uuid::Uuid;

use super::{
    MembershipStore, ProjectStore, StoreResult, StoreTransaction, TaskStore, UnitOfWork,
    UserStore,
};
use crate::db::pool::health_check;
use crate::models::{
    membership::Membership,
    project::{Project, ProjectChanges},
    task::{Task, TaskChanges},
    user::User,
};

const PROJECT_COLUMNS: &str =
    "id, name, description, start_date, end_date, owner_id, created_at, updated_at";

const TASK_COLUMNS: &str = "id, title, description, status, priority, assignee, due_date, \
     project_id, created_by, created_at, updated_at";

/// Store implementation over a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Wraps an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Underlying pool, for migrations and shutdown
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn insert_user(&self, user: &User) -> StoreResult<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, name, email, password_hash, created_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, name, email, password_hash, created_at
            "#,
        )
        .bind(user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, name, email, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl ProjectStore for PgStore {
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn list_projects_for_member(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Project>> {
        let projects = sqlx::query_as::<_, Project>(
            r#"
            SELECT p.id, p.name, p.description, p.start_date, p.end_date,
                   p.owner_id, p.created_at, p.updated_at
            FROM projects AS p
            JOIN project_members AS pm ON pm.project_id = p.id
            WHERE pm.user_id = $1
            ORDER BY p.created_at ASC, p.id ASC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(projects)
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(&format!(
            r#"
            UPDATE projects
            SET name = $2, description = $3, end_date = $4, updated_at = $5
            WHERE id = $1
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.description)
        .bind(changes.end_date)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(project)
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        // project_members and tasks cascade via ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MembershipStore for PgStore {
    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let membership = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, role, joined_at
            FROM project_members
            WHERE project_id = $1 AND user_id = $2
            "#,
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(membership)
    }

    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<Membership>> {
        let memberships = sqlx::query_as::<_, Membership>(
            r#"
            SELECT project_id, user_id, role, joined_at
            FROM project_members
            WHERE project_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(memberships)
    }

    async fn insert_membership(&self, membership: &Membership) -> StoreResult<Membership> {
        let inserted = insert_membership_query(membership)
            .fetch_one(&self.pool)
            .await?;

        Ok(inserted)
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let result =
            sqlx::query("DELETE FROM project_members WHERE project_id = $1 AND user_id = $2")
                .bind(project_id)
                .bind(user_id)
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl TaskStore for PgStore {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task> {
        let inserted = sqlx::query_as::<_, Task>(&format!(
            r#"
            INSERT INTO tasks ({TASK_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task.id)
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.status)
        .bind(task.priority)
        .bind(task.assignee)
        .bind(task.due_date)
        .bind(task.project_id)
        .bind(task.created_by)
        .bind(task.created_at)
        .bind(task.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(inserted)
    }

    async fn find_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1 AND project_id = $2"
        ))
        .bind(task_id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn list_tasks(
        &self,
        project_id: Uuid,
        assignee: Option<Uuid>,
    ) -> StoreResult<Vec<Task>> {
        let tasks = sqlx::query_as::<_, Task>(&format!(
            r#"
            SELECT {TASK_COLUMNS}
            FROM tasks
            WHERE project_id = $1 AND ($2::uuid IS NULL OR assignee = $2)
            ORDER BY created_at ASC
            "#
        ))
        .bind(project_id)
        .bind(assignee)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let task = sqlx::query_as::<_, Task>(&format!(
            r#"
            UPDATE tasks
            SET title = $3, description = $4, status = $5, priority = $6,
                assignee = $7, due_date = $8, updated_at = $9
            WHERE id = $1 AND project_id = $2
            RETURNING {TASK_COLUMNS}
            "#
        ))
        .bind(task_id)
        .bind(project_id)
        .bind(&changes.title)
        .bind(&changes.description)
        .bind(changes.status)
        .bind(changes.priority)
        .bind(changes.assignee)
        .bind(changes.due_date)
        .bind(updated_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1 AND project_id = $2")
            .bind(task_id)
            .bind(project_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl UnitOfWork for PgStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        let tx = self.pool.begin().await?;
        debug!("Opened database transaction");
        Ok(Box::new(PgTransaction { tx }))
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }
}

/// Open PostgreSQL transaction
///
/// sqlx rolls the transaction back if it is dropped before `commit`.
pub struct PgTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl StoreTransaction for PgTransaction {
    async fn insert_project(&mut self, project: &Project) -> StoreResult<Project> {
        let inserted = sqlx::query_as::<_, Project>(&format!(
            r#"
            INSERT INTO projects ({PROJECT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PROJECT_COLUMNS}
            "#
        ))
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.description)
        .bind(project.start_date)
        .bind(project.end_date)
        .bind(project.owner_id)
        .bind(project.created_at)
        .bind(project.updated_at)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(inserted)
    }

    async fn insert_membership(&mut self, membership: &Membership) -> StoreResult<Membership> {
        let inserted = insert_membership_query(membership)
            .fetch_one(&mut *self.tx)
            .await?;

        Ok(inserted)
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        self.tx.commit().await?;
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        self.tx.rollback().await?;
        Ok(())
    }
}

fn insert_membership_query(
    membership: &Membership,
) -> sqlx::query::QueryAs<'_, Postgres, Membership, sqlx::postgres::PgArguments> {
    sqlx::query_as::<_, Membership>(
        r#"
        INSERT INTO project_members (project_id, user_id, role, joined_at)
        VALUES ($1, $2, $3, $4)
        RETURNING project_id, user_id, role, joined_at
        "#,
    )
    .bind(membership.project_id)
    .bind(membership.user_id)
    .bind(membership.role)
    .bind(membership.joined_at)
}
