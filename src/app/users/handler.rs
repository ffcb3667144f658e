//! 用户路由处理器
//!
//! 成功时返回 200 + 数据；任何失败都是 500 + `{"error": ...}`，
//! 找不到记录不算失败。

use axum::{
    extract::{rejection::JsonRejection, rejection::PathRejection, Path, State},
    response::Json,
};

use super::model::{User, UserInput};
use crate::app::AppState;
use crate::core::error::{ApiError, Context, Error};
use crate::core::response::MessageResponse;

type ApiResult<T> = Result<Json<T>, ApiError>;

const FETCH_FAILED: &str = "Failed to fetch users.";
const ADD_FAILED: &str = "Failed to add user.";
const UPDATE_FAILED: &str = "Failed to update user.";
const DELETE_FAILED: &str = "Failed to delete user.";
const EXPORT_FAILED: &str = "Failed to export users.";
const GET_FAILED: &str = "Failed to fetch user.";

fn path_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, Error> {
    id.map(|Path(id)| id)
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}

fn json_body(body: Result<Json<UserInput>, JsonRejection>) -> Result<UserInput, Error> {
    body.map(|Json(input)| input)
        .map_err(|rejection| Error::InvalidInput(rejection.body_text()))
}

/// GET /api/fetch-users
pub async fn fetch_users(State(state): State<AppState>) -> ApiResult<MessageResponse> {
    state
        .user_service
        .import_from_source()
        .await
        .context(FETCH_FAILED)?;
    Ok(Json(MessageResponse::new(
        "Users fetched and stored successfully.",
    )))
}

/// GET /api/users
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Vec<User>> {
    let users = state.user_service.list_users().await.context(FETCH_FAILED)?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Option<User>> {
    let id = path_id(id).context(GET_FAILED)?;
    let user = state.user_service.get_user(id).await.context(GET_FAILED)?;
    Ok(Json(user))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<User> {
    let input = json_body(body).context(ADD_FAILED)?;
    let user = state
        .user_service
        .create_user(input)
        .await
        .context(ADD_FAILED)?;
    Ok(Json(user))
}

/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    body: Result<Json<UserInput>, JsonRejection>,
) -> ApiResult<Option<User>> {
    let id = path_id(id).context(UPDATE_FAILED)?;
    let input = json_body(body).context(UPDATE_FAILED)?;
    let user = state
        .user_service
        .update_user(id, input)
        .await
        .context(UPDATE_FAILED)?;
    Ok(Json(user))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<MessageResponse> {
    let id = path_id(id).context(DELETE_FAILED)?;
    state
        .user_service
        .delete_user(id)
        .await
        .context(DELETE_FAILED)?;
    Ok(Json(MessageResponse::new("User deleted successfully.")))
}

/// GET /api/export-users
pub async fn export_users(State(state): State<AppState>) -> ApiResult<MessageResponse> {
    state
        .user_service
        .export_users()
        .await
        .context(EXPORT_FAILED)?;
    Ok(Json(MessageResponse::new("Users exported to CSV file.")))
}

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> ApiResult<serde_json::Value> {
    state
        .user_service
        .health()
        .await
        .context("Storage unavailable.")?;
    Ok(Json(serde_json::json!({ "status": "ok" })))
}
