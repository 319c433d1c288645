//! Slot HTTP handlers

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::application::slots::SlotService;
use crate::interfaces::http::common::{error_response, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for slot handlers.
#[derive(Clone)]
pub struct SlotAppState {
    pub slots: Arc<SlotService>,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    get,
    path = "/api/slots",
    tag = "Slots",
    responses(
        (status = 200, description = "All slots", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn list_slots(State(state): State<SlotAppState>) -> HandlerResult<Vec<SlotDto>> {
    let slots = state.slots.all_slots().await.map_err(error_response)?;
    let dtos = slots.into_iter().map(SlotDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/slots/available",
    tag = "Slots",
    responses(
        (status = 200, description = "Unreserved slots", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn available_slots(State(state): State<SlotAppState>) -> HandlerResult<Vec<SlotDto>> {
    let slots = state.slots.available_slots().await.map_err(error_response)?;
    let dtos = slots.into_iter().map(SlotDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/slots/{id}",
    tag = "Slots",
    params(("id" = i64, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<SlotDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_slot(
    State(state): State<SlotAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<SlotDto> {
    let slot = state.slots.slot_by_id(id).await.map_err(error_response)?;

    let Some(s) = slot else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Slot {} not found", id))),
        ));
    };

    Ok(Json(ApiResponse::success(SlotDto::from(s))))
}

#[utoipa::path(
    get,
    path = "/api/slots/station/{station_id}",
    tag = "Slots",
    params(("station_id" = i64, Path, description = "Station ID")),
    responses(
        (status = 200, description = "Slots of the station", body = ApiResponse<Vec<SlotDto>>)
    )
)]
pub async fn slots_by_station(
    State(state): State<SlotAppState>,
    Path(station_id): Path<i64>,
) -> HandlerResult<Vec<SlotDto>> {
    let slots = state
        .slots
        .slots_by_station(station_id)
        .await
        .map_err(error_response)?;
    let dtos = slots.into_iter().map(SlotDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    post,
    path = "/api/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    request_body = SaveSlotRequest,
    responses(
        (status = 200, description = "Saved slot", body = ApiResponse<SlotDto>),
        (status = 409, description = "Slot name already in use"),
        (status = 404, description = "Slot to update not found"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn save_slot(
    State(state): State<SlotAppState>,
    ValidatedJson(request): ValidatedJson<SaveSlotRequest>,
) -> HandlerResult<SlotDto> {
    let saved = state
        .slots
        .upsert_slot(request.into())
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(SlotDto::from(saved))))
}

#[utoipa::path(
    delete,
    path = "/api/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Deletion result", body = ApiResponse<bool>),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_slot(
    State(state): State<SlotAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<bool> {
    let deleted = state.slots.delete_slot(id).await.map_err(error_response)?;

    if !deleted {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Slot {} not found", id))),
        ));
    }

    Ok(Json(ApiResponse::success(true)))
}
