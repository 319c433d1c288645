//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories + unified RepositoryProvider.

pub mod repository_provider;
pub mod reservation_repository;
pub mod slot_repository;
pub mod station_repository;
pub mod user_repository;

pub use repository_provider::SeaOrmRepositoryProvider;
