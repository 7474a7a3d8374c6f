use std::collections::HashMap;

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use models::user::User;
use serde::Serialize;

use crate::errors::{ApiError, BodyKey};
use crate::routes::AppState;

/// Envelope for list and search responses.
#[derive(Serialize, Debug)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[utoipa::path(get, path = "/api/v1.0/users/", tag = "users", responses((status = 200, description = "All users", body = crate::openapi::UsersResponseDoc), (status = 405, description = "Method not allowed")))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.list().await.map_err(|e| ApiError::from_service(e, BodyKey::Message))?;
    Ok(Json(UsersResponse { users }))
}

#[utoipa::path(get, path = "/api/v1.0/users/search/", tag = "users", responses((status = 200, description = "Users matching every query parameter", body = crate::openapi::UsersResponseDoc)))]
pub async fn search_users(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<UsersResponse>, ApiError> {
    let users = state.users.search(&params).await.map_err(|e| ApiError::from_service(e, BodyKey::Message))?;
    Ok(Json(UsersResponse { users }))
}

#[utoipa::path(get, path = "/api/v1.0/users/{username}/", tag = "users", params(("username" = String, Path, description = "Exact username")), responses((status = 200, description = "The user", body = crate::openapi::UserDoc), (status = 404, description = "User not found")))]
pub async fn get_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<User>, ApiError> {
    state.users.get(&username).await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, BodyKey::Message))
}

#[utoipa::path(post, path = "/api/v1.0/users/new/", tag = "users", request_body = crate::openapi::UserInputDoc, responses((status = 201, description = "Created", body = crate::openapi::UserDoc), (status = 400, description = "Validation error")))]
pub async fn create_user(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), ApiError> {
    state.users.create(&body).await
        .map(|user| (StatusCode::CREATED, Json(user)))
        .map_err(|e| ApiError::from_service(e, BodyKey::Message))
}

#[utoipa::path(put, path = "/api/v1.0/users/{username}/edit/", tag = "users", params(("username" = String, Path, description = "Exact username")), request_body = crate::openapi::UserInputDoc, responses((status = 200, description = "Updated", body = crate::openapi::UserDoc), (status = 400, description = "Validation error"), (status = 404, description = "User not found")))]
pub async fn update_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<Json<User>, ApiError> {
    state.users.update(&username, &body).await
        .map(Json)
        .map_err(|e| ApiError::from_service(e, BodyKey::Message))
}

#[utoipa::path(delete, path = "/api/v1.0/users/{username}/remove/", tag = "users", params(("username" = String, Path, description = "Exact username")), responses((status = 200, description = "Deleted"), (status = 404, description = "User not found")))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state.users.delete(&username).await.map_err(|e| ApiError::from_service(e, BodyKey::Error))?;
    Ok(Json(serde_json::json!({"message": "User deleted successfully"})))
}

pub async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed(BodyKey::Message)
}

/// The remove endpoint reports a wrong verb under `error`.
pub async fn delete_method_not_allowed() -> ApiError {
    ApiError::method_not_allowed(BodyKey::Error)
}
