//! Axum route handlers for registration, login and account maintenance.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::accounts::store;
use crate::errors::AppError;
use crate::models::user::{User, DEFAULT_ROLE};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Serialize)]
pub struct RoleResponse {
    pub user_id: i64,
    pub role: String,
}

/// POST /api/v1/auth/register
///
/// Self-registration always yields the default role; any `role` in the body is ignored.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<User>), AppError> {
    let user = store::register(&state.db, &req.username, &req.password, DEFAULT_ROLE).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<User>, AppError> {
    let user = store::authenticate(&state.db, &req.username, &req.password).await?;
    Ok(Json(user))
}

/// PUT /api/v1/users/:id/password
pub async fn handle_change_password(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AppError> {
    store::change_password(&state.db, user_id, &req.new_password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/users/:id/role
pub async fn handle_get_role(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<RoleResponse>, AppError> {
    let role = store::get_user_role(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;
    Ok(Json(RoleResponse { user_id, role }))
}

/// DELETE /api/v1/users/:id
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    store::delete_user(&state.db, user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
