//! Authentication and authorization logic.
//!
//! Password hashing, JWT minting/verification, secret resolution and the
//! credential service that ties them to an `AccountStore`.

pub mod jwt;
pub mod password;
pub mod secrets;
pub mod service;

use chrono::Duration;
use thiserror::Error;

use crate::accounts::StoreError;

pub use service::{CredentialService, authorize};

/// Access token lifetime: 15 minutes.
pub const DEFAULT_ACCESS_TTL_SECS: i64 = 15 * 60;

/// Refresh token lifetime: 7 days.
pub const DEFAULT_REFRESH_TTL_SECS: i64 = 7 * 24 * 60 * 60;

/// Longest token lifetime a config accepts: 365 days.
pub const MAX_TOKEN_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 12;

/// Cost bounds accepted by bcrypt.
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Authentication errors.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Same error for unknown email and wrong password.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Which credential was missing (`"bearer"` or `"refresh"`).
    #[error("Missing {0} token")]
    MissingToken(&'static str),

    #[error("Invalid or expired token")]
    InvalidOrExpiredToken,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("User not found")]
    NotFound,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Store error: {0}")]
    Store(StoreError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for AuthError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => AuthError::DuplicateEmail,
            other => AuthError::Store(other),
        }
    }
}

/// Token and hashing settings, fixed for the life of the process.
#[derive(Clone)]
pub struct AuthConfig {
    access_secret: String,
    refresh_secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    bcrypt_cost: u32,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_secret", &"<redacted>")
            .field("refresh_secret", &"<redacted>")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .finish()
    }
}

impl AuthConfig {
    /// Build a config with default lifetimes and cost.
    ///
    /// The two secrets must be non-empty and different, otherwise a refresh
    /// token would verify as an access token.
    pub fn new(
        access_secret: impl Into<String>,
        refresh_secret: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let access_secret = access_secret.into();
        let refresh_secret = refresh_secret.into();
        if access_secret.is_empty() || refresh_secret.is_empty() {
            return Err(AuthError::Config("signing secrets must not be empty".into()));
        }
        if access_secret == refresh_secret {
            return Err(AuthError::Config(
                "access and refresh secrets must differ".into(),
            ));
        }
        Ok(Self {
            access_secret,
            refresh_secret,
            access_ttl: Duration::seconds(DEFAULT_ACCESS_TTL_SECS),
            refresh_ttl: Duration::seconds(DEFAULT_REFRESH_TTL_SECS),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
        })
    }

    pub fn with_access_ttl(mut self, ttl: Duration) -> Result<Self, AuthError> {
        check_ttl("access", ttl)?;
        self.access_ttl = ttl;
        Ok(self)
    }

    pub fn with_refresh_ttl(mut self, ttl: Duration) -> Result<Self, AuthError> {
        check_ttl("refresh", ttl)?;
        self.refresh_ttl = ttl;
        Ok(self)
    }

    pub fn with_bcrypt_cost(mut self, cost: u32) -> Result<Self, AuthError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(AuthError::Config(format!(
                "bcrypt cost must be between {MIN_BCRYPT_COST} and {MAX_BCRYPT_COST}"
            )));
        }
        self.bcrypt_cost = cost;
        Ok(self)
    }

    pub fn access_secret(&self) -> &[u8] {
        self.access_secret.as_bytes()
    }

    pub fn refresh_secret(&self) -> &[u8] {
        self.refresh_secret.as_bytes()
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }
}

fn check_ttl(kind: &str, ttl: Duration) -> Result<(), AuthError> {
    if ttl <= Duration::zero() {
        return Err(AuthError::Config(format!("{kind} token ttl must be positive")));
    }
    if ttl > Duration::seconds(MAX_TOKEN_TTL_SECS) {
        return Err(AuthError::Config(format!(
            "{kind} token ttl must be at most {MAX_TOKEN_TTL_SECS} seconds"
        )));
    }
    Ok(())
}
