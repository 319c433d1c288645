//! Revenue and per-user statistics endpoints

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
