/// Task endpoints under `/v1/projects/:project_id`
///
/// Creation and updates take the whole editable field set; omitted status
/// and priority fall back to `todo` and `medium`.

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use crewboard_shared::{
    auth::middleware::AuthContext,
    models::task::{CreateTask, Task, TaskChanges, TaskPriority, TaskStatus},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

/// Body of task create and update requests
#[derive(Debug, Deserialize, Validate)]
pub struct TaskRequest {
    #[validate(length(min = 1, max = 255, message = "Title must be 1 to 255 characters"))]
    pub title: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    #[serde(default)]
    pub status: TaskStatus,

    #[serde(default)]
    pub priority: TaskPriority,

    pub assignee: Uuid,

    pub due_date: Option<DateTime<Utc>>,
}

pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let Path(project_id) = path?;
    let Json(mut req) = payload?;
    req.title = req.title.trim().to_string();
    state.validator.check(&req)?;

    let task = state
        .services
        .tasks
        .create(CreateTask {
            project_id,
            created_by: auth.user_id,
            assignee: req.assignee,
            title: req.title,
            description: req.description,
            status: req.status,
            priority: req.priority,
            due_date: req.due_date,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path(project_id) = path?;
    let tasks = state
        .services
        .tasks
        .list_for_project(project_id, auth.user_id)
        .await?;
    Ok(Json(tasks))
}

pub async fn list_tasks_for_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<Json<Vec<Task>>> {
    let Path((project_id, user_id)) = path?;
    let tasks = state
        .services
        .tasks
        .list_for_assignee(project_id, user_id, auth.user_id)
        .await?;
    Ok(Json(tasks))
}

pub async fn get_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<Json<Task>> {
    let Path((project_id, task_id)) = path?;
    let task = state
        .services
        .tasks
        .get_by_id(project_id, task_id, auth.user_id)
        .await?;
    Ok(Json(task))
}

pub async fn update_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> ApiResult<Json<Task>> {
    let Path((project_id, task_id)) = path?;
    let Json(mut req) = payload?;
    req.title = req.title.trim().to_string();
    state.validator.check(&req)?;

    let task = state
        .services
        .tasks
        .update(
            project_id,
            task_id,
            auth.user_id,
            TaskChanges {
                title: req.title,
                description: req.description,
                status: req.status,
                priority: req.priority,
                assignee: req.assignee,
                due_date: req.due_date,
            },
        )
        .await?;
    Ok(Json(task))
}

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((project_id, task_id)) = path?;
    state
        .services
        .tasks
        .delete(project_id, task_id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
