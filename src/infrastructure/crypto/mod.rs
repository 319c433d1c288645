//! Cryptographic helpers

pub mod jwt;
