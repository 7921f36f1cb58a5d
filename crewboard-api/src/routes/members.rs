/// Membership endpoints under `/v1/projects/:project_id/members`

use crate::{app::AppState, error::ApiResult};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use crewboard_shared::{auth::middleware::AuthContext, models::membership::Membership};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct AddMemberRequest {
    pub user_id: Uuid,

    /// Role name, e.g. `admin` or `member`
    pub role: String,
}

pub async fn add_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
    payload: Result<Json<AddMemberRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Membership>)> {
    let Path(project_id) = path?;
    let Json(req) = payload?;
    let role = state.validator.role("role", &req.role)?;

    let membership = state
        .services
        .members
        .add(project_id, auth.user_id, req.user_id, role)
        .await?;

    Ok((StatusCode::CREATED, Json(membership)))
}

pub async fn list_members(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<Vec<Membership>>> {
    let Path(project_id) = path?;
    let members = state
        .services
        .members
        .list(project_id, auth.user_id)
        .await?;
    Ok(Json(members))
}

pub async fn remove_member(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    path: Result<Path<(Uuid, Uuid)>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path((project_id, user_id)) = path?;
    state
        .services
        .members
        .remove(project_id, auth.user_id, user_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
