//! # coursekit_core
//!
//! Core domain logic for Coursekit: accounts, account stores, password
//! hashing, and the credential & token service.

pub mod accounts;
pub mod auth;
pub mod migrate;
pub mod models;
pub mod uuid;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
