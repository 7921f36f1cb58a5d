/// `GET /v1/users/:user_id`

use crate::{app::AppState, error::ApiResult};
use axum::extract::{rejection::PathRejection, Path, State};
use axum::Json;
use crewboard_shared::models::user::User;
use uuid::Uuid;

pub async fn get_user(
    State(state): State<AppState>,
    path: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Json<User>> {
    let Path(user_id) = path?;
    let user = state.services.users.get_by_id(user_id).await?;
    Ok(Json(user))
}
