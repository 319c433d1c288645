//! Slot aggregate

mod model;
mod repository;

pub use model::{ChargingType, Slot};
pub use repository::SlotRepository;
