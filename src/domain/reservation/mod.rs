//! Reservation aggregate

mod model;
mod repository;

pub use model::{Reservation, ReservationStatus};
pub use repository::ReservationRepository;
