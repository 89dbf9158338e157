//! Authentication domain models.

use serde::{Deserialize, Serialize};

use super::account::{AccountSummary, Role};

/// JWT claims embedded in both access and refresh tokens.
///
/// Fixed shape: a token missing any field, or carrying an unknown role,
/// fails to decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — account ID (standard JWT `sub` claim).
    pub sub: String,
    /// Account role at the time the token was minted.
    pub role: Role,
    /// Expiry (unix timestamp).
    pub exp: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
}

/// Result of a successful login or registration.
///
/// The refresh token is only ever handed to the cookie layer; API response
/// bodies are built from `access_token` and `account`.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub account: AccountSummary,
}
