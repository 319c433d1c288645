//! User HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::users::UserService;
use crate::interfaces::http::common::{error_response, ApiResponse};

use super::dto::*;

/// Application state for user handlers.
#[derive(Clone)]
pub struct UserAppState {
    pub users: Arc<UserService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All users", body = ApiResponse<Vec<UserDto>>)
    )
)]
pub async fn list_users(State(state): State<UserAppState>) -> HandlerResult<Vec<UserDto>> {
    let users = state.users.all_users().await.map_err(error_response)?;
    let dtos = users.into_iter().map(UserDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/users/count",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Total user count", body = ApiResponse<UserCountDto>)
    )
)]
pub async fn user_count(State(state): State<UserAppState>) -> HandlerResult<UserCountDto> {
    let total_users = state.users.total_users().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(UserCountDto { total_users })))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UserAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<UserDto> {
    let user = state.users.user_by_id(id).await.map_err(error_response)?;

    let Some(u) = user else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("User {} not found", id))),
        ));
    };

    Ok(Json(ApiResponse::success(UserDto::from(u))))
}
