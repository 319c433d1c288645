//! Reservation HTTP handlers

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::DateTime;

use crate::application::reservations::{CreateReservation, ReservationService};
use crate::application::users::UserService;
use crate::infrastructure::crypto::jwt::{resolve_email, verify_token, JwtConfig};
use crate::interfaces::http::common::{bearer_token, error_response, ApiResponse, ValidatedJson};

use super::dto::*;

/// Application state for reservation handlers.
#[derive(Clone)]
pub struct ReservationAppState {
    pub reservations: Arc<ReservationService>,
    pub users: Arc<UserService>,
    pub jwt: JwtConfig,
}

type HandlerResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

#[utoipa::path(
    post,
    path = "/api/reservations/create",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 200, description = "Reservation created", body = ApiResponse<ReservationDto>),
        (status = 404, description = "User or slot not found"),
        (status = 409, description = "Slot already reserved"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Token does not match the requesting user"),
        (status = 400, description = "Invalid request")
    )
)]
pub async fn create_reservation(
    State(state): State<ReservationAppState>,
    headers: HeaderMap,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> HandlerResult<ReservationDto> {
    // The token must belong to the reserving user; admins may book on
    // behalf of anyone.
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
        let owner = state
            .users
            .user_by_email(&claims.email)
            .await
            .map_err(error_response)?;
        match owner {
            Some(u) if u.id == request.user_id => {}
            _ => {
                return Err((
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::error(
                        "Token does not match the requesting user",
                    )),
                ));
            }
        }
    }

    let start_time = DateTime::parse_from_rfc3339(&request.start_time)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error(format!("Invalid startTime: {}", e))),
            )
        })?;

    let reservation = state
        .reservations
        .create_reservation(CreateReservation {
            user_id: request.user_id,
            slot_id: request.slot_id,
            consumption_kwh: request.consumption_kwh,
            price_per_kwh: request.price_per_kwh,
            start_time,
            duration_minutes: request.duration_minutes,
        })
        .await
        .map_err(error_response)?;

    Ok(Json(ApiResponse::success(ReservationDto::from(reservation))))
}

#[utoipa::path(
    put,
    path = "/api/reservations/{id}/cancel",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Cancellation result", body = ApiResponse<CancelReservationResponse>)
    )
)]
pub async fn cancel_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<CancelReservationResponse> {
    let canceled = state
        .reservations
        .cancel_reservation(id)
        .await
        .map_err(error_response)?;

    let message = if canceled {
        "Reservation cancelled successfully".to_string()
    } else {
        format!("Reservation {} is not active or does not exist", id)
    };

    Ok(Json(ApiResponse::success(CancelReservationResponse {
        canceled,
        message,
    })))
}

#[utoipa::path(
    get,
    path = "/api/reservations/all",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All reservations", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_reservations(
    State(state): State<ReservationAppState>,
) -> HandlerResult<Vec<ReservationDto>> {
    let reservations = state
        .reservations
        .all_reservations()
        .await
        .map_err(error_response)?;

    let users: HashMap<i64, _> = state
        .users
        .all_users()
        .await
        .map_err(error_response)?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();

    let dtos = reservations
        .into_iter()
        .map(|r| {
            let user = users.get(&r.user_id);
            ReservationDto::with_user(r, user)
        })
        .collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/reservations/myReservations",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Reservations of the token's user", body = ApiResponse<Vec<ReservationDto>>),
        (status = 401, description = "Missing or invalid token")
    )
)]
pub async fn my_reservations(
    State(state): State<ReservationAppState>,
    headers: HeaderMap,
) -> HandlerResult<Vec<ReservationDto>> {
    let email = token_email(&headers, &state.jwt)?;

    let reservations = state
        .reservations
        .reservations_for_email(&email)
        .await
        .map_err(error_response)?;

    let dtos = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_reservation(
    State(state): State<ReservationAppState>,
    Path(id): Path<i64>,
) -> HandlerResult<ReservationDto> {
    let reservation = state
        .reservations
        .reservation_by_id(id)
        .await
        .map_err(error_response)?;

    let Some(r) = reservation else {
        return Err((
            StatusCode::NOT_FOUND,
            Json(ApiResponse::error(format!("Reservation {} not found", id))),
        ));
    };

    let user = state.users.user_by_id(r.user_id).await.map_err(error_response)?;
    Ok(Json(ApiResponse::success(ReservationDto::with_user(
        r,
        user.as_ref(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/reservations/slot/{slot_id}/active",
    tag = "Reservations",
    security(("bearer_auth" = [])),
    params(("slot_id" = i64, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Ongoing or upcoming ACTIVE reservations for the slot", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn active_for_slot(
    State(state): State<ReservationAppState>,
    Path(slot_id): Path<i64>,
) -> HandlerResult<Vec<ReservationDto>> {
    let reservations = state
        .reservations
        .active_reservations_by_slot(slot_id)
        .await
        .map_err(error_response)?;

    let dtos = reservations.into_iter().map(ReservationDto::from).collect();
    Ok(Json(ApiResponse::success(dtos)))
}

/// Resolve the token's email or fail with 401.
pub(crate) fn token_email<T>(
    headers: &HeaderMap,
    jwt: &JwtConfig,
) -> Result<String, (StatusCode, Json<ApiResponse<T>>)> {
    let token = bearer_token(headers).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Missing bearer token")),
        )
    })?;
    resolve_email(token, jwt).ok_or_else(|| {
        (
            StatusCode::UNAUTHORIZED,
            Json(ApiResponse::error("Invalid or expired token")),
        )
    })
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};

    use crate::application::telemetry::NoopTelemetry;
    use crate::domain::{ChargingType, RepositoryProvider, Slot, Station, User, UserRole};
    use crate::infrastructure::crypto::jwt::TokenClaims;
    use crate::infrastructure::storage::memory::InMemoryRepositoryProvider;

    async fn app_state() -> ReservationAppState {
        let repos = Arc::new(InMemoryRepositoryProvider::new());

        repos
            .users()
            .save(User::new(0, "Alice", "alice@example.com", UserRole::User))
            .await
            .unwrap();
        repos
            .users()
            .save(User::new(0, "Bob", "bob@example.com", UserRole::User))
            .await
            .unwrap();

        let station = repos
            .stations()
            .save(Station::new(0, "Campus North", 40.64, -8.65))
            .await
            .unwrap();
        repos
            .slots()
            .save(Slot::new(0, station.id, "A-01", ChargingType::Fast))
            .await
            .unwrap();

        ReservationAppState {
            reservations: Arc::new(ReservationService::new(
                repos.clone(),
                Arc::new(NoopTelemetry),
            )),
            users: Arc::new(UserService::new(repos)),
            jwt: JwtConfig {
                secret: "handler-test-secret".to_string(),
                issuer: "evcharge".to_string(),
            },
        }
    }

    fn signed_headers(jwt: &JwtConfig, email: &str) -> HeaderMap {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: "1".to_string(),
            email: email.to_string(),
            role: "USER".to_string(),
            exp: (now + Duration::hours(1)).timestamp(),
            iat: now.timestamp(),
            iss: jwt.issuer.clone(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(jwt.secret.as_bytes()),
        )
        .unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, format!("Bearer {}", token).parse().unwrap());
        headers
    }

    fn request(user_id: i64) -> CreateReservationRequest {
        CreateReservationRequest {
            user_id,
            slot_id: 1,
            consumption_kwh: 10.0,
            price_per_kwh: 0.30,
            start_time: (Utc::now() + Duration::hours(1)).to_rfc3339(),
            duration_minutes: 60,
        }
    }

    #[tokio::test]
    async fn create_rejects_missing_token() {
        let state = app_state().await;
        let result =
            create_reservation(State(state), HeaderMap::new(), ValidatedJson(request(1))).await;
        let (status, _) = result.unwrap_err();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn create_rejects_token_of_another_user() {
        let state = app_state().await;
        let headers = signed_headers(&state.jwt, "bob@example.com");
        let result = create_reservation(State(state), headers, ValidatedJson(request(1))).await;
        let (status, _) = result.unwrap_err();
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn create_accepts_matching_token() {
        let state = app_state().await;
        let headers = signed_headers(&state.jwt, "alice@example.com");
        let response = create_reservation(State(state), headers, ValidatedJson(request(1)))
            .await
            .unwrap();
        let dto = response.0.data.unwrap();
        assert_eq!(dto.user_id, 1);
        assert_eq!(dto.status, "ACTIVE");
    }

    #[tokio::test]
    async fn listing_joins_user_details() {
        let state = app_state().await;
        let headers = signed_headers(&state.jwt, "alice@example.com");
        create_reservation(State(state.clone()), headers, ValidatedJson(request(1)))
            .await
            .unwrap();

        let response = list_reservations(State(state)).await.unwrap();
        let dtos = response.0.data.unwrap();
        assert_eq!(dtos.len(), 1);
        assert_eq!(dtos[0].user_email.as_deref(), Some("alice@example.com"));
        assert_eq!(dtos[0].user_name.as_deref(), Some("Alice"));
    }
}
