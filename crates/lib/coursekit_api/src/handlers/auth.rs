//! Authentication request handlers.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum_extra::extract::cookie::CookieJar;
use coursekit_core::models::auth::TokenPair;

use crate::AppState;
use crate::error::AppResult;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::{
    LoginRequest, LoginResponse, ProfileResponse, RefreshResponse, RegisterRequest,
};
use crate::services::cookies;

/// Put the refresh token in its cookie and the rest in the body.
fn signed_in(state: &AppState, jar: CookieJar, pair: TokenPair) -> (CookieJar, Json<LoginResponse>) {
    let cookie = cookies::refresh_cookie(
        &pair.refresh_token,
        state.auth.refresh_ttl(),
        state.config.cookie_secure,
    );
    (
        jar.add(cookie),
        Json(LoginResponse {
            access_token: pair.access_token,
            user: pair.account,
        }),
    )
}

/// `POST /auth/login` — authenticate with email + password.
pub async fn login_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let pair = state.auth.authenticate(&body.email, &body.password).await?;
    Ok(signed_in(&state, jar, pair))
}

/// `POST /auth/register` — create a student account and sign it in.
pub async fn register_handler(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(body): Json<RegisterRequest>,
) -> AppResult<impl IntoResponse> {
    let pair = state
        .auth
        .register(&body.name, &body.email, &body.password)
        .await?;
    Ok((StatusCode::CREATED, signed_in(&state, jar, pair)))
}

/// `POST /auth/refresh` — exchange the refresh cookie for a new access token.
pub async fn refresh_handler(
    State(state): State<AppState>,
    jar: CookieJar,
) -> AppResult<Json<RefreshResponse>> {
    let access_token = state.auth.refresh(cookies::refresh_token(&jar)).await?;
    Ok(Json(RefreshResponse { access_token }))
}

/// `POST /auth/logout` — clear the refresh cookie. Issued access tokens stay
/// valid until they expire.
pub async fn logout_handler(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    (
        StatusCode::NO_CONTENT,
        jar.add(cookies::clear_refresh_cookie(state.config.cookie_secure)),
    )
}

/// `GET /auth/me` — profile of the authenticated account.
pub async fn me_handler(
    State(state): State<AppState>,
    axum::Extension(user): axum::Extension<AuthenticatedUser>,
) -> AppResult<Json<ProfileResponse>> {
    let account = state.auth.current_account(&user.0).await?;
    Ok(Json(account.into()))
}
