//! JWT token generation and verification.
//!
//! Access and refresh tokens share one claim shape and are told apart only
//! by the key that signed them.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::{AuthConfig, AuthError};
use crate::models::account::Role;
use crate::models::auth::TokenClaims;

/// Which of the two token families a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Signing and verification keys for both token kinds.
#[derive(Clone)]
pub struct TokenKeys {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenKeys {
    pub fn from_config(config: &AuthConfig) -> Self {
        Self {
            access_encoding: EncodingKey::from_secret(config.access_secret()),
            access_decoding: DecodingKey::from_secret(config.access_secret()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret()),
            access_ttl: config.access_ttl(),
            refresh_ttl: config.refresh_ttl(),
        }
    }

    pub fn ttl(&self, kind: TokenKind) -> Duration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }

    /// Sign a token of `kind` for `subject`, expiring `ttl(kind)` from now.
    pub fn mint(&self, kind: TokenKind, subject: &str, role: Role) -> Result<String, AuthError> {
        self.mint_at(kind, subject, role, Utc::now())
    }

    /// Sign a token as if issued at `issued_at`.
    pub fn mint_at(
        &self,
        kind: TokenKind,
        subject: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<String, AuthError> {
        let expires_at = issued_at
            .checked_add_signed(self.ttl(kind))
            .ok_or_else(|| AuthError::Internal("token expiry out of range".into()))?;
        let claims = TokenClaims {
            sub: subject.to_string(),
            role,
            exp: expires_at.timestamp(),
            iat: issued_at.timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, self.encoding(kind))
            .map_err(|e| AuthError::Internal(format!("jwt encode: {e}")))
    }

    /// Verify signature and expiry, returning the claims on success.
    pub fn verify(&self, kind: TokenKind, token: &str) -> Result<TokenClaims, AuthError> {
        decode::<TokenClaims>(token, self.decoding(kind), &validation())
            .map(|data| data.claims)
            .map_err(|e| {
                tracing::debug!(?kind, error = %e, "token rejected");
                AuthError::InvalidOrExpiredToken
            })
    }

    fn encoding(&self, kind: TokenKind) -> &EncodingKey {
        match kind {
            TokenKind::Access => &self.access_encoding,
            TokenKind::Refresh => &self.refresh_encoding,
        }
    }

    fn decoding(&self, kind: TokenKind) -> &DecodingKey {
        match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        }
    }
}

/// HS256 only, no clock leeway, `exp` and `sub` required.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.validate_exp = true;
    validation.set_required_spec_claims(&["exp", "sub"]);
    validation
}
