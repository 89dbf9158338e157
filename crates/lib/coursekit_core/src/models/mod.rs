//! Domain models shared by the stores, the auth service and the API layer.

pub mod account;
pub mod auth;
