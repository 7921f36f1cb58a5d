/// In-memory store
///
/// Thread-safe, process-local implementation of [`Store`](super::Store)
/// that mirrors the PostgreSQL schema: unique keys, foreign keys, the
/// single-owner index and cascading project deletes are all enforced, and
/// constraint names match the ones Postgres reports.
///
/// Transactions stage their writes privately and apply them under a single
/// write lock on commit. Dropping a [`MemoryTransaction`] discards them.
///
/// [`StoreFaults`] lets tests make individual operations fail, which is how
/// the atomicity of project creation is exercised without a database.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    MembershipStore, ProjectStore, StoreError, StoreResult, StoreTransaction, TaskStore,
    UnitOfWork, UserStore,
};
use crate::models::{
    membership::Membership,
    project::{Project, ProjectChanges},
    task::{Task, TaskChanges},
    user::User,
};

#[derive(Debug, Default)]
struct State {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    // insertion order doubles as join order
    memberships: Vec<Membership>,
    tasks: HashMap<Uuid, Task>,
}

impl State {
    fn check_user(&self, id: Uuid, constraint: &str) -> StoreResult<()> {
        if self.users.contains_key(&id) {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation(constraint.to_string()))
        }
    }

    fn check_project_insert(&self, project: &Project) -> StoreResult<()> {
        if self.projects.contains_key(&project.id) {
            return Err(StoreError::UniqueViolation("projects_pkey".to_string()));
        }
        self.check_user(project.owner_id, "projects_owner_id_fkey")
    }

    fn check_membership_insert(
        &self,
        membership: &Membership,
        staged_projects: &[Project],
        staged_memberships: &[Membership],
    ) -> StoreResult<()> {
        let project_known = self.projects.contains_key(&membership.project_id)
            || staged_projects.iter().any(|p| p.id == membership.project_id);
        if !project_known {
            return Err(StoreError::ForeignKeyViolation(
                "project_members_project_id_fkey".to_string(),
            ));
        }
        self.check_user(membership.user_id, "project_members_user_id_fkey")?;

        let existing = self.memberships.iter().chain(staged_memberships.iter());
        for m in existing {
            if m.project_id != membership.project_id {
                continue;
            }
            if m.user_id == membership.user_id {
                return Err(StoreError::UniqueViolation("project_members_pkey".to_string()));
            }
            if m.is_owner() && membership.is_owner() {
                return Err(StoreError::UniqueViolation(
                    "project_members_single_owner".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Switches that make selected operations fail with [`StoreError::Backend`]
#[derive(Debug, Default)]
pub struct StoreFaults {
    fail_membership_inserts: AtomicBool,
    fail_commits: AtomicBool,
}

impl StoreFaults {
    /// Makes every membership insert fail, inside or outside a transaction
    pub fn fail_membership_inserts(&self, fail: bool) {
        self.fail_membership_inserts.store(fail, Ordering::SeqCst);
    }

    /// Makes every transaction commit fail
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    fn check_membership_insert(&self) -> StoreResult<()> {
        if self.fail_membership_inserts.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected membership insert failure".to_string()));
        }
        Ok(())
    }

    fn check_commit(&self) -> StoreResult<()> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }
        Ok(())
    }
}

/// In-memory [`Store`](super::Store) implementation
///
/// Cloning is cheap and clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<State>>,
    faults: Arc<StoreFaults>,
}

impl InMemoryStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Fault switches for this store
    pub fn faults(&self) -> &StoreFaults {
        &self.faults
    }

    /// Number of stored projects
    pub async fn project_count(&self) -> usize {
        self.state.read().await.projects.len()
    }

    /// Number of stored memberships across all projects
    pub async fn membership_count(&self) -> usize {
        self.state.read().await.memberships.len()
    }
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn insert_user(&self, user: &User) -> StoreResult<User> {
        let mut state = self.state.write().await;
        if state.users.contains_key(&user.id) {
            return Err(StoreError::UniqueViolation("users_pkey".to_string()));
        }
        if state.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }
        state.users.insert(user.id, user.clone());
        Ok(user.clone())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.state.read().await.users.get(&id).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.values().find(|u| u.email == email).cloned())
    }
}

#[async_trait]
impl ProjectStore for InMemoryStore {
    async fn find_project(&self, id: Uuid) -> StoreResult<Option<Project>> {
        Ok(self.state.read().await.projects.get(&id).cloned())
    }

    async fn list_projects_for_member(
        &self,
        user_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<Project>> {
        let state = self.state.read().await;
        let mut projects: Vec<Project> = state
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .filter_map(|m| state.projects.get(&m.project_id).cloned())
            .collect();
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let offset = usize::try_from(offset).unwrap_or(0);
        let limit = usize::try_from(limit).unwrap_or(0);
        Ok(projects.into_iter().skip(offset).take(limit).collect())
    }

    async fn update_project(
        &self,
        id: Uuid,
        changes: &ProjectChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Project>> {
        let mut state = self.state.write().await;
        Ok(state.projects.get_mut(&id).map(|project| {
            project.apply(changes, updated_at);
            project.clone()
        }))
    }

    async fn delete_project(&self, id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        if state.projects.remove(&id).is_none() {
            return Ok(false);
        }
        state.memberships.retain(|m| m.project_id != id);
        state.tasks.retain(|_, t| t.project_id != id);
        Ok(true)
    }
}

#[async_trait]
impl MembershipStore for InMemoryStore {
    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> StoreResult<Option<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .find(|m| m.project_id == project_id && m.user_id == user_id)
            .cloned())
    }

    async fn list_memberships(&self, project_id: Uuid) -> StoreResult<Vec<Membership>> {
        let state = self.state.read().await;
        Ok(state
            .memberships
            .iter()
            .filter(|m| m.project_id == project_id)
            .cloned()
            .collect())
    }

    async fn insert_membership(&self, membership: &Membership) -> StoreResult<Membership> {
        self.faults.check_membership_insert()?;
        let mut state = self.state.write().await;
        state.check_membership_insert(membership, &[], &[])?;
        state.memberships.push(membership.clone());
        Ok(membership.clone())
    }

    async fn delete_membership(&self, project_id: Uuid, user_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let before = state.memberships.len();
        state
            .memberships
            .retain(|m| !(m.project_id == project_id && m.user_id == user_id));
        Ok(state.memberships.len() != before)
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn insert_task(&self, task: &Task) -> StoreResult<Task> {
        let mut state = self.state.write().await;
        if state.tasks.contains_key(&task.id) {
            return Err(StoreError::UniqueViolation("tasks_pkey".to_string()));
        }
        if !state.projects.contains_key(&task.project_id) {
            return Err(StoreError::ForeignKeyViolation(
                "tasks_project_id_fkey".to_string(),
            ));
        }
        state.check_user(task.assignee, "tasks_assignee_fkey")?;
        state.check_user(task.created_by, "tasks_created_by_fkey")?;
        state.tasks.insert(task.id, task.clone());
        Ok(task.clone())
    }

    async fn find_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<Option<Task>> {
        let state = self.state.read().await;
        Ok(state
            .tasks
            .get(&task_id)
            .filter(|t| t.project_id == project_id)
            .cloned())
    }

    async fn list_tasks(
        &self,
        project_id: Uuid,
        assignee: Option<Uuid>,
    ) -> StoreResult<Vec<Task>> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|t| t.project_id == project_id)
            .filter(|t| assignee.map_or(true, |a| t.assignee == a))
            .cloned()
            .collect();
        tasks.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    async fn update_task(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        changes: &TaskChanges,
        updated_at: DateTime<Utc>,
    ) -> StoreResult<Option<Task>> {
        let mut state = self.state.write().await;
        let belongs = state
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.project_id == project_id);
        if !belongs {
            return Ok(None);
        }
        state.check_user(changes.assignee, "tasks_assignee_fkey")?;

        Ok(state.tasks.get_mut(&task_id).map(|task| {
            task.apply(changes, updated_at);
            task.clone()
        }))
    }

    async fn delete_task(&self, project_id: Uuid, task_id: Uuid) -> StoreResult<bool> {
        let mut state = self.state.write().await;
        let belongs = state
            .tasks
            .get(&task_id)
            .is_some_and(|t| t.project_id == project_id);
        if belongs {
            state.tasks.remove(&task_id);
        }
        Ok(belongs)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryStore {
    async fn begin(&self) -> StoreResult<Box<dyn StoreTransaction>> {
        Ok(Box::new(MemoryTransaction {
            state: Arc::clone(&self.state),
            faults: Arc::clone(&self.faults),
            projects: Vec::new(),
            memberships: Vec::new(),
        }))
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// Staged writes against an [`InMemoryStore`]
pub struct MemoryTransaction {
    state: Arc<RwLock<State>>,
    faults: Arc<StoreFaults>,
    projects: Vec<Project>,
    memberships: Vec<Membership>,
}

#[async_trait]
impl StoreTransaction for MemoryTransaction {
    async fn insert_project(&mut self, project: &Project) -> StoreResult<Project> {
        let state = self.state.read().await;
        state.check_project_insert(project)?;
        if self.projects.iter().any(|p| p.id == project.id) {
            return Err(StoreError::UniqueViolation("projects_pkey".to_string()));
        }
        drop(state);

        self.projects.push(project.clone());
        Ok(project.clone())
    }

    async fn insert_membership(&mut self, membership: &Membership) -> StoreResult<Membership> {
        self.faults.check_membership_insert()?;
        let state = self.state.read().await;
        state.check_membership_insert(membership, &self.projects, &self.memberships)?;
        drop(state);

        self.memberships.push(membership.clone());
        Ok(membership.clone())
    }

    async fn commit(self: Box<Self>) -> StoreResult<()> {
        let MemoryTransaction {
            state,
            faults,
            projects,
            memberships,
        } = *self;
        faults.check_commit()?;
        let mut state = state.write().await;

        // constraints are checked again: other writers may have run since staging
        for project in &projects {
            state.check_project_insert(project)?;
        }
        for (i, membership) in memberships.iter().enumerate() {
            state.check_membership_insert(membership, &projects, &memberships[..i])?;
        }

        for project in projects {
            state.projects.insert(project.id, project);
        }
        state.memberships.extend(memberships);
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> StoreResult<()> {
        Ok(())
    }
}
