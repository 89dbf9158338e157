//! Credential & token service.
//!
//! Owns the account store handle and the token keys. Every operation
//! returns an explicit `AuthError`; the HTTP layer maps those to statuses.

use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, info, warn};

use super::jwt::{TokenKeys, TokenKind};
use super::password::{hash_password, verify_password};
use super::{AuthConfig, AuthError};
use crate::accounts::{AccountPage, AccountStore, validate};
use crate::models::account::{Account, AccountPatch, NewAccount, Role, normalize_email};
use crate::models::auth::{TokenClaims, TokenPair};

/// Input for creating an account with a plaintext password.
#[derive(Debug, Clone)]
pub struct CreateAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

/// Input for a partial account update. A password, if present, is hashed
/// before it reaches the store.
#[derive(Debug, Clone, Default)]
pub struct UpdateAccount {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

/// Fail unless `claims.role` is one of `allowed`.
pub fn authorize(claims: &TokenClaims, allowed: &[Role]) -> Result<(), AuthError> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(AuthError::InsufficientPermissions)
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken("bearer"))
}

/// Plaintext behind the hash checked when no account matches a login.
const DUMMY_PASSWORD: &str = "coursekit-dummy-password";

#[derive(Clone)]
pub struct CredentialService {
    store: Arc<dyn AccountStore>,
    keys: TokenKeys,
    bcrypt_cost: u32,
    dummy_hash: Option<Arc<str>>,
}

impl CredentialService {
    pub fn new(store: Arc<dyn AccountStore>, config: &AuthConfig) -> Self {
        let dummy_hash = match hash_password(DUMMY_PASSWORD, config.bcrypt_cost()) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                warn!(error = %e, "could not precompute dummy password hash");
                None
            }
        };
        Self {
            store,
            keys: TokenKeys::from_config(config),
            bcrypt_cost: config.bcrypt_cost(),
            dummy_hash,
        }
    }

    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.keys.ttl(TokenKind::Refresh)
    }

    /// Check an email/password pair and issue a token pair.
    ///
    /// An unknown email and a wrong password produce the same
    /// `InvalidCredentials` error and cost the same bcrypt work.
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() || password.len() > validate::MAX_PASSWORD_BYTES
        {
            return Err(AuthError::InvalidCredentials);
        }

        let Some(account) = self.store.find_by_email(&email).await? else {
            self.verify_dummy(password);
            debug!("login rejected");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password(password, &account.password_hash)? {
            debug!("login rejected");
            return Err(AuthError::InvalidCredentials);
        }

        info!(account_id = %account.id, role = %account.role, "login succeeded");
        self.issue_pair(&account)
    }

    /// Create a student account and sign it in.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        let account = self
            .create_account(CreateAccount {
                name: name.to_string(),
                email: email.to_string(),
                password: password.to_string(),
                role: Role::Student,
            })
            .await?;
        info!(account_id = %account.id, "account registered");
        self.issue_pair(&account)
    }

    /// Mint a new access token from a refresh token. The refresh token is
    /// not rotated.
    pub async fn refresh(&self, refresh_token: Option<&str>) -> Result<String, AuthError> {
        let token = refresh_token
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken("refresh"))?;
        let claims = self.keys.verify(TokenKind::Refresh, token)?;
        self.keys.mint(TokenKind::Access, &claims.sub, claims.role)
    }

    /// Verify the access token in an `Authorization` header value.
    pub fn verify_access(&self, authorization: Option<&str>) -> Result<TokenClaims, AuthError> {
        let token = bearer_token(authorization)?;
        self.keys.verify(TokenKind::Access, token)
    }

    /// Load the account behind verified claims.
    pub async fn current_account(&self, claims: &TokenClaims) -> Result<Account, AuthError> {
        self.get_account(&claims.sub).await
    }

    pub async fn get_account(&self, id: &str) -> Result<Account, AuthError> {
        self.store.find_by_id(id).await?.ok_or(AuthError::NotFound)
    }

    pub async fn list_accounts(&self, page: u32, limit: u32) -> Result<AccountPage, AuthError> {
        Ok(self.store.list(page, limit).await?)
    }

    /// Validate input, hash the password and store a new account.
    pub async fn create_account(&self, input: CreateAccount) -> Result<Account, AuthError> {
        let name = validate::name(&input.name).map_err(AuthError::Validation)?;
        let email = validate::email(&input.email).map_err(AuthError::Validation)?;
        validate::password(&input.password).map_err(AuthError::Validation)?;

        let password_hash = hash_password(&input.password, self.bcrypt_cost)?;
        let account = self
            .store
            .create(NewAccount {
                name,
                email,
                role: input.role,
                password_hash,
            })
            .await?;
        Ok(account)
    }

    pub async fn update_account(&self, id: &str, input: UpdateAccount) -> Result<Account, AuthError> {
        let patch = AccountPatch {
            name: input
                .name
                .as_deref()
                .map(validate::name)
                .transpose()
                .map_err(AuthError::Validation)?,
            email: input
                .email
                .as_deref()
                .map(validate::email)
                .transpose()
                .map_err(AuthError::Validation)?,
            role: input.role,
            password_hash: match input.password.as_deref() {
                Some(password) => {
                    validate::password(password).map_err(AuthError::Validation)?;
                    Some(hash_password(password, self.bcrypt_cost)?)
                }
                None => None,
            },
        };

        if patch.is_empty() {
            return self.get_account(id).await;
        }

        let account = self
            .store
            .update(id, patch)
            .await?
            .ok_or(AuthError::NotFound)?;
        info!(account_id = %account.id, "account updated");
        Ok(account)
    }

    pub async fn delete_account(&self, id: &str) -> Result<(), AuthError> {
        if self.store.delete(id).await? {
            info!(account_id = %id, "account deleted");
            Ok(())
        } else {
            Err(AuthError::NotFound)
        }
    }

    /// Run a bcrypt comparison whose outcome is discarded, so a missing
    /// account takes as long to reject as a wrong password.
    fn verify_dummy(&self, password: &str) -> bool {
        match &self.dummy_hash {
            Some(hash) => {
                // Result is irrelevant; only the work matters.
                let _ = verify_password(password, hash);
                true
            }
            None => false,
        }
    }

    fn issue_pair(&self, account: &Account) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.keys.mint(TokenKind::Access, &account.id, account.role)?,
            refresh_token: self.keys.mint(TokenKind::Refresh, &account.id, account.role)?,
            account: account.summary(),
        })
    }
}
