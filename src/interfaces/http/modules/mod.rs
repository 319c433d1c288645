//! Feature modules of the HTTP API
//!
//! Each module holds its DTOs and handlers; the router wires them up.

pub mod health;
pub mod metrics;
pub mod reservations;
pub mod slots;
pub mod stations;
pub mod statistics;
pub mod users;
