//! Infrastructure layer: persistence, crypto, in-memory storage

pub mod crypto;
pub mod database;
pub mod storage;
