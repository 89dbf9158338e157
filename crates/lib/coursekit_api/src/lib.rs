//! # coursekit_api
//!
//! HTTP API library for Coursekit.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::Router;
use axum::routing::{get, post};
use coursekit_core::auth::CredentialService;
use tower_http::cors::{Any, CorsLayer};

use crate::config::ApiConfig;
use crate::handlers::{auth, health, users};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Credential & token service (owns the account store).
    pub auth: CredentialService,
    /// API configuration.
    pub config: ApiConfig,
}

impl AppState {
    pub fn new(auth: CredentialService, config: ApiConfig) -> Self {
        Self { auth, config }
    }
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route(routes::GET_HEALTHZ, get(health::health_handler))
        .route(routes::POST_AUTH_REGISTER, post(auth::register_handler))
        .route(routes::POST_AUTH_LOGIN, post(auth::login_handler))
        .route(routes::POST_AUTH_REFRESH, post(auth::refresh_handler))
        .route(routes::POST_AUTH_LOGOUT, post(auth::logout_handler));

    // Instructor-only routes; merged under the bearer check below.
    let instructor = Router::new()
        .route(routes::USERS, post(users::create_user_handler))
        .route(
            routes::USER_BY_ID,
            axum::routing::patch(users::update_user_handler).delete(users::delete_user_handler),
        )
        .route_layer(axum::middleware::from_fn(
            middleware::auth::require_instructor,
        ));

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route(routes::GET_AUTH_ME, get(auth::me_handler))
        .route(routes::USERS, get(users::list_users_handler))
        .route(routes::USER_BY_ID, get(users::get_user_handler))
        .merge(instructor)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(axum::middleware::from_fn(
            middleware::request_timer::request_timer,
        ))
        .layer(cors)
        .with_state(state)
}
