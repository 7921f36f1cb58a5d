/// Task access mediation
///
/// Any project member may create, read and update tasks; deleting one needs
/// edit rights. A task's creator and assignee must both be members when it
/// is created. Assignees are not re-checked on update, and tasks survive
/// their assignee leaving the project.
///
/// Missing tasks are only reported once the actor has passed the
/// membership check, so outsiders cannot probe for task IDs.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::directory::MembershipDirectory;
use super::require_access;
use crate::auth::authorization::ProjectAction;
use crate::error::{CoreError, CoreResult};
use crate::models::task::{CreateTask, Task, TaskChanges};
use crate::store::Store;

#[derive(Clone)]
pub struct TaskService {
    store: Arc<dyn Store>,
    directory: MembershipDirectory,
}

fn task_not_found(project_id: Uuid, task_id: Uuid) -> CoreError {
    CoreError::NotFound(format!("Task {task_id} not found in project {project_id}"))
}

impl TaskService {
    pub fn new(store: Arc<dyn Store>, directory: MembershipDirectory) -> Self {
        Self { store, directory }
    }

    /// Creates a task; creator and assignee must both be members
    pub async fn create(&self, data: CreateTask) -> CoreResult<Task> {
        let project_id = data.project_id;
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            data.created_by,
            ProjectAction::CreateTask,
        )
        .await?;

        if self.directory.find(project_id, data.assignee).await?.is_none() {
            warn!(
                project_id = %project_id,
                assignee = %data.assignee,
                "Rejected task for non-member assignee"
            );
            return Err(CoreError::Forbidden(format!(
                "Assignee {} is not a member of project {project_id}",
                data.assignee
            )));
        }

        let task = self.store.insert_task(&Task::new(data)).await?;
        info!(
            project_id = %project_id,
            task_id = %task.id,
            created_by = %task.created_by,
            status = %task.status,
            priority = %task.priority,
            "Task created"
        );
        Ok(task)
    }

    /// All tasks of a project
    pub async fn list_for_project(&self, project_id: Uuid, actor_id: Uuid) -> CoreResult<Vec<Task>> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::View,
        )
        .await?;

        let tasks = self.store.list_tasks(project_id, None).await?;
        debug!(project_id = %project_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    /// Tasks of a project assigned to `assignee_id`
    pub async fn list_for_assignee(
        &self,
        project_id: Uuid,
        assignee_id: Uuid,
        actor_id: Uuid,
    ) -> CoreResult<Vec<Task>> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::View,
        )
        .await?;

        let tasks = self.store.list_tasks(project_id, Some(assignee_id)).await?;
        debug!(
            project_id = %project_id,
            assignee = %assignee_id,
            count = tasks.len(),
            "Listed tasks for assignee"
        );
        Ok(tasks)
    }

    pub async fn get_by_id(&self, project_id: Uuid, task_id: Uuid, actor_id: Uuid) -> CoreResult<Task> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::View,
        )
        .await?;

        self.store
            .find_task(project_id, task_id)
            .await?
            .ok_or_else(|| task_not_found(project_id, task_id))
    }

    /// Replaces a task's editable fields; any member may do this
    pub async fn update(
        &self,
        project_id: Uuid,
        task_id: Uuid,
        actor_id: Uuid,
        changes: TaskChanges,
    ) -> CoreResult<Task> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::UpdateTask,
        )
        .await?;

        let task = self
            .store
            .update_task(project_id, task_id, &changes, Utc::now())
            .await?
            .ok_or_else(|| task_not_found(project_id, task_id))?;

        info!(
            project_id = %project_id,
            task_id = %task_id,
            actor_id = %actor_id,
            status = %task.status,
            "Task updated"
        );
        Ok(task)
    }

    /// Deletes a task; needs edit rights
    pub async fn delete(&self, project_id: Uuid, task_id: Uuid, actor_id: Uuid) -> CoreResult<()> {
        require_access(
            self.store.as_ref(),
            &self.directory,
            project_id,
            actor_id,
            ProjectAction::DeleteTask,
        )
        .await?;

        if !self.store.delete_task(project_id, task_id).await? {
            return Err(task_not_found(project_id, task_id));
        }

        info!(project_id = %project_id, task_id = %task_id, actor_id = %actor_id, "Task deleted");
        Ok(())
    }
}
