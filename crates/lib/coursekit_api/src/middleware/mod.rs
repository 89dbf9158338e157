//! Request middleware.

pub mod auth;
pub mod request_timer;
