//! In-memory account store.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{AccountPage, AccountStore, StoreError, page_offset};
use crate::models::account::{Account, AccountPatch, NewAccount};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Inner {
    accounts: HashMap<String, Account>,
    /// email -> id
    by_email: HashMap<String, String>,
}

/// Account store backed by process memory. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    inner: RwLock<Inner>,
}

impl MemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .by_email
            .get(email)
            .and_then(|id| inner.accounts.get(id))
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        Ok(self.inner.read().await.accounts.get(id).cloned())
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut inner = self.inner.write().await;
        if inner.by_email.contains_key(&account.email) {
            return Err(StoreError::DuplicateEmail);
        }

        let now = Utc::now();
        let created = Account {
            id: uuidv7().to_string(),
            name: account.name,
            email: account.email,
            role: account.role,
            password_hash: account.password_hash,
            created_at: now,
            updated_at: now,
        };
        inner
            .by_email
            .insert(created.email.clone(), created.id.clone());
        inner.accounts.insert(created.id.clone(), created.clone());
        Ok(created)
    }

    async fn update(&self, id: &str, patch: AccountPatch) -> Result<Option<Account>, StoreError> {
        let mut inner = self.inner.write().await;
        let Some(current) = inner.accounts.get(id).cloned() else {
            return Ok(None);
        };

        if let Some(email) = &patch.email
            && *email != current.email
        {
            if inner.by_email.contains_key(email) {
                return Err(StoreError::DuplicateEmail);
            }
            inner.by_email.remove(&current.email);
            inner.by_email.insert(email.clone(), id.to_string());
        }

        let updated = Account {
            name: patch.name.unwrap_or(current.name),
            email: patch.email.unwrap_or(current.email),
            role: patch.role.unwrap_or(current.role),
            password_hash: patch.password_hash.unwrap_or(current.password_hash),
            updated_at: Utc::now(),
            ..current
        };
        inner.accounts.insert(id.to_string(), updated.clone());
        Ok(Some(updated))
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        match inner.accounts.remove(id) {
            Some(account) => {
                inner.by_email.remove(&account.email);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, page: u32, limit: u32) -> Result<AccountPage, StoreError> {
        let inner = self.inner.read().await;
        let mut items: Vec<Account> = inner.accounts.values().cloned().collect();
        // UUIDv7 ids break ties between accounts created in the same instant.
        items.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });

        let total = items.len() as u64;
        let offset = usize::try_from(page_offset(page, limit)).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(limit as usize)
            .collect();
        Ok(AccountPage { items, total })
    }
}
