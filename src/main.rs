//! EV charge reservation service entrypoint
//!
//! Reads configuration from a TOML file (~/.config/evcharge/config.toml),
//! runs migrations and serves the REST API.

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use evcharge::application::reservations::ReservationService;
use evcharge::application::slots::SlotService;
use evcharge::application::stations::StationService;
use evcharge::application::statistics::StatisticsService;
use evcharge::application::telemetry::MetricsTelemetry;
use evcharge::application::users::UserService;
use evcharge::config::AppConfig;
use evcharge::domain::RepositoryProvider;
use evcharge::infrastructure::crypto::jwt::JwtConfig;
use evcharge::infrastructure::database::migrator::Migrator;
use evcharge::{
    create_api_router, default_config_path, init_database, ApiState, DatabaseConfig,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("EVCHARGE_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            warn!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting EV charge reservation service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("Prometheus metrics recorder installed");

    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let jwt_config = JwtConfig {
        secret: app_cfg.security.jwt_secret.clone(),
        issuer: app_cfg.security.jwt_issuer.clone(),
    };

    // ── Database ───────────────────────────────────────────────
    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Repositories and services ──────────────────────────────
    let repos: Arc<dyn RepositoryProvider> = Arc::new(SeaOrmRepositoryProvider::new(db.clone()));

    let state = ApiState {
        reservation_service: Arc::new(ReservationService::new(
            repos.clone(),
            Arc::new(MetricsTelemetry),
        )),
        statistics_service: Arc::new(StatisticsService::new(repos.clone())),
        station_service: Arc::new(StationService::new(repos.clone())),
        slot_service: Arc::new(SlotService::new(repos.clone())),
        user_service: Arc::new(UserService::new(repos)),
        jwt: jwt_config,
    };

    let router = create_api_router(state, db.clone(), prometheus_handle);

    // ── Serve ──────────────────────────────────────────────────
    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Shutdown signal received");
        })
        .await?;

    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("Database connection closed");
    }

    info!("Shutdown complete");
    Ok(())
}
