//! Station HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::stations::StationService;
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for station handlers.
#[derive(Clone)]
pub struct StationAppState {
    pub stations: Arc<StationService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    get,
    path = "/api/stations",
    tag = "Stations",
    responses(
        (status = 200, description = "All stations", body = ApiResponse<Vec<StationDto>>)
    )
)]
pub async fn list_stations(State(state): State<StationAppState>) -> HandlerResult<Vec<StationDto>> {
    let stations = state.stations.all_stations().await.map_err(error_response)?;
    let dtos = stations.into_iter().map(StationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/stations/{id}",
    tag = "Stations",
    params(("id" = i64, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Station details", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_station(
    State(state): State<StationAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<StationDto> {
    let station = state
        .stations
        .station_by_id(id)
        .await
        .map_err(error_response)?;

    let Some(s) = station else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Station {} not found", id))),
        ));
    };

    Ok(Json(ApiResponse::success(StationDto::from(s))))
}

#[utoipa::path(
    post,
    path = "/api/stations",
    tag = "Stations",
    security(("bearer_auth" = [])),
    request_body = SaveStationRequest,
    responses(
        (status = 200, description = "Saved station", body = ApiResponse<StationDto>),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn save_station(
    State(state): State<StationAppState>,
    ValidatedJson(request): ValidatedJson<SaveStationRequest>,
) -> HandlerResult<StationDto> {
    let station = request.into_station().map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error(e)),
        )
    })?;

    let saved = state
        .stations
        .save_station(station)
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(StationDto::from(saved))))
}

#[utoipa::path(
    put,
    path = "/api/stations/{id}/discount",
    tag = "Stations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Station ID")),
    request_body = DiscountRequest,
    responses(
        (status = 200, description = "Updated station", body = ApiResponse<StationDto>),
        (status = 404, description = "Not found"),
        (status = 400, description = "Invalid discount value")
    )
)]
pub async fn set_discount(
    State(state): State<StationAppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<DiscountRequest>,
) -> HandlerResult<StationDto> {
    let updated = state
        .stations
        .toggle_discount(id, request.active, request.value)
        .await
        .map_err(error_response)?;

    if !updated {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Station {} not found", id))),
        ));
    }

    let station = state
        .stations
        .station_by_id(id)
        .await
        .map_err(error_response)?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                Json(ApiResponse::error(format!("Station {} not found", id))),
            )
        })?;

    Ok(Json(ApiResponse::success(StationDto::from(station))))
}
