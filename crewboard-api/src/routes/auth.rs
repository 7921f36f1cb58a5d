/// Authentication endpoints
///
/// - `POST /v1/auth/register`: create an account and receive tokens
/// - `POST /v1/auth/login`: exchange email and password for tokens
/// - `POST /v1/auth/refresh`: exchange a refresh token for an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use crewboard_shared::services::user::{Registration, TokenPair};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 100, message = "Name must be 1 to 100 characters"))]
    pub name: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Returned by register and login
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,

    #[serde(flatten)]
    pub tokens: TokenPair,
}

#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let Json(req) = payload?;
    state.validator.check(&req)?;

    let user = state
        .services
        .users
        .register(Registration {
            name: req.name,
            email: req.email,
            password: req.password,
        })
        .await?;
    let tokens = state.services.users.issue_tokens(user.id)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            tokens,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<AuthResponse>> {
    let Json(req) = payload?;
    state.validator.check(&req).map_err(|_| {
        // malformed credentials get the same answer as wrong ones
        ApiError::Unauthorized("Invalid email or password".to_string())
    })?;

    let (user, tokens) = state.services.users.login(&req.email, &req.password).await?;

    Ok(Json(AuthResponse {
        user_id: user.id,
        tokens,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    payload: Result<Json<RefreshRequest>, JsonRejection>,
) -> ApiResult<Json<RefreshResponse>> {
    let Json(req) = payload?;
    let access_token = state.services.users.refresh(&req.refresh_token)?;

    Ok(Json(RefreshResponse { access_token }))
}
