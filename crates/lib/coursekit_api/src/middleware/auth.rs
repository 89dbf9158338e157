//! Authentication middleware — Bearer token extraction, JWT verification
//! and role gating.

use axum::http::header::AUTHORIZATION;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use coursekit_core::auth::{AuthError, authorize};
use coursekit_core::models::account::Role;
use coursekit_core::models::auth::TokenClaims;

use crate::AppState;
use crate::error::AppError;

/// Key used to store `TokenClaims` in request extensions.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub TokenClaims);

/// Axum middleware: extracts `Authorization: Bearer <token>`, verifies the JWT,
/// and injects `AuthenticatedUser` into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let claims = state.auth.verify_access(header)?;
    request.extensions_mut().insert(AuthenticatedUser(claims));

    Ok(next.run(request).await)
}

/// Reject the request unless the authenticated role is in `allowed`.
/// Must run inside `require_auth`.
pub async fn require_roles(
    allowed: &[Role],
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthenticatedUser>()
        .ok_or(AuthError::MissingToken("bearer"))?;
    authorize(&user.0, allowed)?;
    Ok(next.run(request).await)
}

/// `require_roles` for instructor-only routes.
pub async fn require_instructor(request: Request, next: Next) -> Result<Response, AppError> {
    require_roles(&[Role::Instructor], request, next).await
}
