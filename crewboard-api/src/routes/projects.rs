/// Project endpoints
///
/// - `POST /v1/projects`: create a project owned by the caller
/// - `GET /v1/projects?page=N`: the caller's projects, `N` starting at 1
/// - `GET|PUT|DELETE /v1/projects/:project_id`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use chrono::{DateTime, Utc};
use crewboard_shared::{
    auth::middleware::AuthContext,
    models::project::{CreateProject, Project, ProjectChanges},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be 3 to 255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    pub start_date: DateTime<Utc>,

    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 3, max = 255, message = "Name must be 3 to 255 characters"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 5000, message = "Description is too long"))]
    pub description: String,

    pub end_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct ListProjectsQuery {
    /// 1-based page number
    pub page: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
    pub page: i64,
    pub per_page: i64,
}

pub async fn create_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    payload: Result<Json<CreateProjectRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let Json(mut req) = payload?;
    req.name = req.name.trim().to_string();
    state.validator.check(&req)?;
    state.validator.date_range(req.start_date, req.end_date)?;

    let project = state
        .services
        .projects
        .create(
            auth.user_id,
            CreateProject {
                name: req.name,
                description: req.description,
                start_date: req.start_date,
                end_date: req.end_date,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

pub async fn list_projects(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    query: Result<Query<ListProjectsQuery>, QueryRejection>,
) -> ApiResult<Json<ProjectListResponse>> {
    let Query(query) = query?;
    let page = query.page.unwrap_or(1).max(1);

    let projects = state
        .services
        .projects
        .get_for_user(auth.user_id, page - 1)
        .await?;

    Ok(Json(ProjectListResponse {
        projects,
        page,
        per_page: state.services.projects.per_page(),
    }))
}

pub async fn get_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Project>> {
    let Path(project_id) = path?;
    let project = state
        .services
        .projects
        .get_by_id(project_id, auth.user_id)
        .await?;
    Ok(Json(project))
}

pub async fn update_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<UpdateProjectRequest>, JsonRejection>,
) -> ApiResult<Json<Project>> {
    let Path(project_id) = path?;
    let Json(mut req) = payload?;
    req.name = req.name.trim().to_string();
    state.validator.check(&req)?;

    let project = state
        .services
        .projects
        .update(
            project_id,
            auth.user_id,
            ProjectChanges {
                name: req.name,
                description: req.description,
                end_date: req.end_date,
            },
        )
        .await?;
    Ok(Json(project))
}

pub async fn delete_project(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(project_id) = path?;
    state
        .services
        .projects
        .delete(project_id, auth.user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
