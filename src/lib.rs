//! # EV Charge Reservation Service
//!
//! Backend for reserving EV charging slots: atomic slot claims, session
//! pricing with per-station discount windows, cancellation and revenue
//! statistics.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, types and repository traits
//! - **application**: Business logic and use cases
//! - **infrastructure**: External concerns (database, JWT, in-memory storage)
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};

// Re-export database types for easy access
pub use infrastructure::database::{init_database, DatabaseConfig, SeaOrmRepositoryProvider};

// Re-export API router
pub use interfaces::http::{create_api_router, ApiState};
