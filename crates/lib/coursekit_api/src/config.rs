//! API server configuration.

use std::fmt::Display;
use std::str::FromStr;

use chrono::Duration;
use coursekit_core::auth::secrets::resolve_secret;
use coursekit_core::auth::{
    AuthConfig, AuthError, DEFAULT_ACCESS_TTL_SECS, DEFAULT_BCRYPT_COST, DEFAULT_REFRESH_TTL_SECS,
};
use thiserror::Error;
use tracing::info;

/// Configuration errors raised at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid {key}={value}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:4000").
    pub bind_addr: String,
    /// PostgreSQL connection URL.
    pub database_url: String,
    /// Token secrets, lifetimes and bcrypt cost.
    pub auth: AuthConfig,
    /// Mark the refresh cookie `Secure`. On in production.
    pub cookie_secure: bool,
}

impl ApiConfig {
    /// Config with development defaults around an existing `AuthConfig`.
    pub fn new(auth: AuthConfig) -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".into(),
            database_url: "postgres://localhost:5432/coursekit".into(),
            auth,
            cookie_secure: false,
        }
    }

    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable                 | Default                                  |
    /// |--------------------------|------------------------------------------|
    /// | `BIND_ADDR`              | `127.0.0.1:4000`                         |
    /// | `DATABASE_URL`           | `postgres://localhost:5432/coursekit`    |
    /// | `JWT_SECRET`             | generated & persisted to `access-secret` |
    /// | `JWT_REFRESH_SECRET`     | generated & persisted to `refresh-secret`|
    /// | `BCRYPT_COST`            | `12`                                     |
    /// | `ACCESS_TOKEN_TTL_SECS`  | `900`                                    |
    /// | `REFRESH_TOKEN_TTL_SECS` | `604800`                                 |
    /// | `APP_ENV`                | `development`                            |
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth = AuthConfig::new(
            resolve_secret("JWT_SECRET", "access-secret"),
            resolve_secret("JWT_REFRESH_SECRET", "refresh-secret"),
        )?
        .with_bcrypt_cost(parse_env("BCRYPT_COST", DEFAULT_BCRYPT_COST)?)?
        .with_access_ttl(ttl_from_secs(
            "ACCESS_TOKEN_TTL_SECS",
            parse_env("ACCESS_TOKEN_TTL_SECS", DEFAULT_ACCESS_TTL_SECS)?,
        )?)?
        .with_refresh_ttl(ttl_from_secs(
            "REFRESH_TOKEN_TTL_SECS",
            parse_env("REFRESH_TOKEN_TTL_SECS", DEFAULT_REFRESH_TTL_SECS)?,
        )?)?;

        let app_env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        info!(app_env = %app_env, "loaded configuration");

        Ok(Self {
            bind_addr: std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:4000".into()),
            database_url: std::env::var("DATABASE_URL")
                .unwrap_or_else(|_| "postgres://localhost:5432/coursekit".into()),
            auth,
            cookie_secure: is_production(&app_env),
        })
    }
}

fn is_production(app_env: &str) -> bool {
    app_env.eq_ignore_ascii_case("production")
}

/// Read `key` from the environment, falling back to `default` when unset.
fn parse_env<T>(key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match std::env::var(key) {
        Ok(raw) => parse_value(key, &raw),
        Err(_) => Ok(default),
    }
}

fn ttl_from_secs(key: &'static str, secs: i64) -> Result<Duration, ConfigError> {
    Duration::try_seconds(secs).ok_or_else(|| ConfigError::Invalid {
        key,
        value: secs.to_string(),
        reason: "duration out of range".into(),
    })
}

fn parse_value<T>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
