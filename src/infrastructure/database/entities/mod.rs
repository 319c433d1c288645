//! SeaORM entities

pub mod reservation;
pub mod slot;
pub mod station;
pub mod user;
