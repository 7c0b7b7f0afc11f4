//! User handlers (`/api/user`).

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use storefront_core::commerce::{
    validate_user, ApiResponse, CreateUserRequest, UpdateUserRequest, User,
};

use super::error::{not_found, AppError};
use crate::state::AppState;

/// POST /api/user
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<User>>), AppError> {
    let user = payload.into_user();
    validate_user(&user)?;
    state.users.create_user(&user).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok("User created", user)),
    ))
}

/// GET /api/user
pub async fn list_users(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<User>>>, AppError> {
    let users = state.users.list_users().await?;
    Ok(Json(ApiResponse::ok("Success", users)))
}

/// GET /api/user/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| not_found("User", id))?;
    Ok(Json(ApiResponse::ok("Success", user)))
}

/// PUT /api/user/{id}
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<ApiResponse<User>>, AppError> {
    let mut user = state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| not_found("User", id))?;
    payload.apply_to(&mut user);
    validate_user(&user)?;
    state.users.update_user(&user).await?;
    Ok(Json(ApiResponse::ok("User updated", user)))
}

/// DELETE /api/user/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    state.users.delete_user(id).await?;
    Ok(Json(ApiResponse::ok_empty("User deleted")))
}
