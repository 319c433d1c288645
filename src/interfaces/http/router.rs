//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRef,
    middleware,
    routing::{get, post, put},
    Router,
};
use sea_orm::DatabaseConnection;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::reservations::ReservationService;
use crate::application::slots::SlotService;
use crate::application::stations::StationService;
use crate::application::statistics::StatisticsService;
use crate::application::users::UserService;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, EmptyData};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::{
    health, reservations, slots, stations, statistics, users,
};

/// Unified state for all API routes.
/// Axum extracts the specific handler state via `FromRef`.
#[derive(Clone)]
pub struct ApiState {
    pub reservation_service: Arc<ReservationService>,
    pub statistics_service: Arc<StatisticsService>,
    pub station_service: Arc<StationService>,
    pub slot_service: Arc<SlotService>,
    pub user_service: Arc<UserService>,
    pub jwt: JwtConfig,
}

// -- FromRef implementations so each handler keeps its own State<T> extractor --

impl FromRef<ApiState> for reservations::ReservationAppState {
    fn from_ref(s: &ApiState) -> Self {
        reservations::ReservationAppState {
            reservations: Arc::clone(&s.reservation_service),
            users: Arc::clone(&s.user_service),
            jwt: s.jwt.clone(),
        }
    }
}

impl FromRef<ApiState> for statistics::StatisticsAppState {
    fn from_ref(s: &ApiState) -> Self {
        statistics::StatisticsAppState {
            stats: Arc::clone(&s.statistics_service),
            users: Arc::clone(&s.user_service),
            slots: Arc::clone(&s.slot_service),
            jwt: s.jwt.clone(),
        }
    }
}

impl FromRef<ApiState> for stations::StationAppState {
    fn from_ref(s: &ApiState) -> Self {
        stations::StationAppState {
            stations: Arc::clone(&s.station_service),
        }
    }
}

impl FromRef<ApiState> for slots::SlotAppState {
    fn from_ref(s: &ApiState) -> Self {
        slots::SlotAppState {
            slots: Arc::clone(&s.slot_service),
        }
    }
}

impl FromRef<ApiState> for users::UserAppState {
    fn from_ref(s: &ApiState) -> Self {
        users::UserAppState {
            users: Arc::clone(&s.user_service),
        }
    }
}

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Reservations
        reservations::create_reservation,
        reservations::cancel_reservation,
        reservations::list_reservations,
        reservations::my_reservations,
        reservations::get_reservation,
        reservations::active_for_slot,
        // Statistics
        statistics::revenue,
        statistics::my_stats,
        statistics::admin_stats,
        // Stations
        stations::list_stations,
        stations::get_station,
        stations::save_station,
        stations::set_discount,
        // Slots
        slots::list_slots,
        slots::available_slots,
        slots::get_slot,
        slots::slots_by_station,
        slots::save_slot,
        slots::delete_slot,
        // Users
        users::list_users,
        users::user_count,
        users::get_user,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            EmptyData,
            // Health
            health::HealthResponse,
            health::ComponentHealth,
            // Reservations
            reservations::CreateReservationRequest,
            reservations::ReservationDto,
            reservations::CancelReservationResponse,
            // Statistics
            statistics::RevenueDto,
            statistics::AdminStatsDto,
            statistics::WeeklyConsumptionDto,
            statistics::ClientStatsDto,
            // Stations
            stations::StationDto,
            stations::SaveStationRequest,
            stations::DiscountRequest,
            // Slots
            slots::SlotDto,
            slots::SaveSlotRequest,
            // Users
            users::UserDto,
            users::UserCountDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Server health check endpoints"),
        (name = "Reservations", description = "Reservation lifecycle: creation, cancellation, lookups"),
        (name = "Statistics", description = "Revenue totals and per-user statistics"),
        (name = "Stations", description = "Charging station management and discount windows"),
        (name = "Slots", description = "Charging slot management and availability"),
        (name = "Users", description = "User queries"),
    ),
    info(
        title = "EV Charge Reservation API",
        version = "1.0.0",
        description = "REST API for reserving EV charging slots",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    state: ApiState,
    db: DatabaseConnection,
    prometheus_handle: PrometheusHandle,
) -> Router {
    // Route order matters: literal segments before the `{id}` captures.
    let reservation_routes = Router::new()
        .route("/all", get(reservations::list_reservations))
        .route("/create", post(reservations::create_reservation))
        .route("/myReservations", get(reservations::my_reservations))
        .route("/revenue", get(statistics::revenue))
        .route("/myStats", get(statistics::my_stats))
        .route("/admin/stats", get(statistics::admin_stats))
        .route("/slot/{slot_id}/active", get(reservations::active_for_slot))
        .route("/{id}/cancel", put(reservations::cancel_reservation))
        .route("/{id}", get(reservations::get_reservation))
        .with_state(state.clone());

    let station_routes = Router::new()
        .route(
            "/",
            get(stations::list_stations).post(stations::save_station),
        )
        .route("/{id}", get(stations::get_station))
        .route("/{id}/discount", put(stations::set_discount))
        .with_state(state.clone());

    let slot_routes = Router::new()
        .route("/", get(slots::list_slots).post(slots::save_slot))
        .route("/available", get(slots::available_slots))
        .route("/station/{station_id}", get(slots::slots_by_station))
        .route("/{id}", get(slots::get_slot).delete(slots::delete_slot))
        .with_state(state.clone());

    let user_routes = Router::new()
        .route("/", get(users::list_users))
        .route("/count", get(users::user_count))
        .route("/{id}", get(users::get_user))
        .with_state(state);

    let health_state = health::HealthState {
        db,
        started_at: Arc::new(Instant::now()),
    };

    let metrics_state = MetricsState {
        handle: prometheus_handle,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route(
            "/health",
            get(health::health_check).with_state(health_state),
        )
        .route(
            "/metrics",
            get(prometheus_metrics).with_state(metrics_state),
        )
        .nest("/api/reservations", reservation_routes)
        .nest("/api/stations", station_routes)
        .nest("/api/slots", slot_routes)
        .nest("/api/users", user_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
