//! Statistics HTTP handlers

use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;

use crate::application::slots::SlotService;
use crate::application::statistics::StatisticsService;
use crate::application::users::UserService;
use crate::infrastructure::crypto::jwt::{verify_token, JwtConfig};
use crate::interfaces::http::common::{bearer_token, error_response, ApiResponse};
use crate::interfaces::http::modules::reservations::handlers::token_email;

use super::dto::*;

/// Application state for statistics handlers.
#[derive(Clone)]
pub struct StatisticsAppState {
    pub stats: Arc<StatisticsService>,
    pub users: Arc<UserService>,
    pub slots: Arc<SlotService>,
    pub jwt: JwtConfig,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    get,
    path = "/api/reservations/revenue",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Total revenue over all reservations", body = ApiResponse<RevenueDto>)
    )
)]
pub async fn revenue(State(state): State<StatisticsAppState>) -> HandlerResult<RevenueDto> {
    let total_revenue = state.stats.total_revenue().await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(RevenueDto { total_revenue })))
}

#[utoipa::path(
    get,
    path = "/api/reservations/myStats",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Statistics for the token's user", body = ApiResponse<ClientStatsDto>),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "No user for this token")
    )
)]
pub async fn my_stats(
    State(state): State<StatisticsAppState>,
    headers: HeaderMap,
) -> HandlerResult<ClientStatsDto> {
    let email = token_email(&headers, &state.jwt)?;

    let stats = state
        .stats
        .client_stats_for_email(&email)
        .await
        .map_err(error_response)?;

    let Some(stats) = stats else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("No user with email {}", email))),
        ));
    };

    Ok(Json(ApiResponse::success(ClientStatsDto::from(stats))))
}

#[utoipa::path(
    get,
    path = "/api/reservations/admin/stats",
    tag = "Statistics",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Admin dashboard aggregates", body = ApiResponse<AdminStatsDto>),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token is not an admin")
    )
)]
pub async fn admin_stats(
    State(state): State<StatisticsAppState>,
    headers: HeaderMap,
) -> HandlerResult<AdminStatsDto> {
    let token = bearer_token(&headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Missing bearer token")),
        )
    })?;
    let claims = verify_token(token, &state.jwt).map_err(|_| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid or expired token")),
        )
    })?;
    if !claims.is_admin() {
        return Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Admin role required")),
        ));
    }

    let total_revenue = state.stats.total_revenue().await.map_err(error_response)?;
    let current_month_revenue = state
        .stats
        .current_month_revenue()
        .await
        .map_err(error_response)?;
    let total_users = state.users.total_users().await.map_err(error_response)?;
    let total_chargers = state.slots.total_chargers().await.map_err(error_response)?;
    let available_chargers = state
        .slots
        .available_chargers()
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(AdminStatsDto {
        total_revenue,
        current_month_revenue,
        total_users,
        total_chargers,
        available_chargers,
    })))
}
