//! Cookie service — set/get/clear the httpOnly refresh cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::routes::AUTH_COOKIE_PATH;

/// Cookie name for the refresh token.
pub const REFRESH_COOKIE: &str = "refreshToken";

/// Build the httpOnly refresh cookie, scoped to the auth routes.
pub fn refresh_cookie(token: &str, max_age: chrono::Duration, secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), token.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(AUTH_COOKIE_PATH)
        .max_age(Duration::seconds(max_age.num_seconds()))
        .build()
}

/// Build an expired refresh cookie to clear auth state.
pub fn clear_refresh_cookie(secure: bool) -> Cookie<'static> {
    Cookie::build((REFRESH_COOKIE.to_string(), String::new()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path(AUTH_COOKIE_PATH)
        .max_age(Duration::ZERO)
        .build()
}

/// Refresh token presented by the client, if any.
pub fn refresh_token(jar: &CookieJar) -> Option<&str> {
    jar.get(REFRESH_COOKIE).map(|c| c.value())
}
