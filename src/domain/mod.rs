//! Core business entities, types and traits

pub mod error;
pub mod repositories;
pub mod reservation;
pub mod slot;
pub mod station;
pub mod user;

pub use error::{DomainError, DomainResult};
pub use repositories::RepositoryProvider;
pub use reservation::{Reservation, ReservationRepository, ReservationStatus};
pub use slot::{ChargingType, Slot, SlotRepository};
pub use station::{Station, StationRepository};
pub use user::{User, UserRepository, UserRole};
