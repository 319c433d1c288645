//! Station aggregate

mod model;
mod repository;

pub use model::Station;
pub use repository::StationRepository;
