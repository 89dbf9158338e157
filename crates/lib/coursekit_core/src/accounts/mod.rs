//! Account persistence.
//!
//! `AccountStore` is the seam between the credential service and storage.
//! Two implementations ship: Postgres (`PgAccountStore`) and an in-process
//! map (`MemoryAccountStore`) used by tests and the server's in-memory mode.

pub mod memory;
pub mod postgres;
pub mod validate;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::account::{Account, AccountPatch, NewAccount};

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Corrupt account row: {0}")]
    Corrupt(String),

    #[error("Database error: {0}")]
    Db(#[from] sqlx::Error),
}

/// One page of accounts, newest first.
#[derive(Debug, Clone)]
pub struct AccountPage {
    pub items: Vec<Account>,
    pub total: u64,
}

/// Persistence collaborator for accounts.
///
/// Emails passed in are already normalized. Ids that do not parse as a
/// stored id behave like missing rows rather than errors.
#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError>;

    /// Insert a new account. Fails with `DuplicateEmail` if the email is taken.
    async fn create(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Apply a patch, bumping `updated_at`. `None` if the id is unknown.
    async fn update(&self, id: &str, patch: AccountPatch) -> Result<Option<Account>, StoreError>;

    /// Delete an account. `false` if the id is unknown.
    async fn delete(&self, id: &str) -> Result<bool, StoreError>;

    /// List accounts newest first. `page` is 1-based.
    async fn list(&self, page: u32, limit: u32) -> Result<AccountPage, StoreError>;

    /// Cheap connectivity probe for health checks.
    async fn ping(&self) -> bool {
        true
    }
}

/// Zero-based offset of a 1-based page.
pub(crate) fn page_offset(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_offset_is_zero_for_first_page() {
        assert_eq!(page_offset(1, 10), 0);
        assert_eq!(page_offset(0, 10), 0);
        assert_eq!(page_offset(3, 25), 50);
    }
}
