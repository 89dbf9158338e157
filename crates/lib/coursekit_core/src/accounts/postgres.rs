//! Postgres-backed account store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use super::{AccountPage, AccountStore, StoreError, page_offset};
use crate::models::account::{Account, AccountPatch, NewAccount, Role};
use crate::uuid::{parse_id, uuidv7};

const ACCOUNT_COLUMNS: &str =
    "id::text, name, email, role, password_hash, created_at, updated_at";

type AccountRow = (
    String,
    String,
    String,
    String,
    String,
    DateTime<Utc>,
    DateTime<Utc>,
);

fn from_row(row: AccountRow) -> Result<Account, StoreError> {
    let (id, name, email, role, password_hash, created_at, updated_at) = row;
    let role = role
        .parse::<Role>()
        .map_err(|e| StoreError::Corrupt(format!("account {id}: {e}")))?;
    Ok(Account {
        id,
        name,
        email,
        role,
        password_hash,
        created_at,
        updated_at,
    })
}

fn map_write_error(e: sqlx::Error) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::DuplicateEmail,
        _ => StoreError::Db(e),
    }
}

/// Account store over a PostgreSQL pool. Expects the embedded migrations
/// to have been applied.
#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<Account>, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        row.map(from_row).transpose()
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Account>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(from_row).transpose()
    }

    async fn create(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO accounts (id, name, email, role, password_hash) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(uuidv7())
        .bind(&account.name)
        .bind(&account.email)
        .bind(account.role.as_str())
        .bind(&account.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)?;
        from_row(row)
    }

    async fn update(&self, id: &str, patch: AccountPatch) -> Result<Option<Account>, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(None);
        };
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "UPDATE accounts SET \
               name = COALESCE($2, name), \
               email = COALESCE($3, email), \
               role = COALESCE($4, role), \
               password_hash = COALESCE($5, password_hash), \
               updated_at = now() \
             WHERE id = $1 \
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.email)
        .bind(patch.role.map(|r| r.as_str()))
        .bind(patch.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?;
        row.map(from_row).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let Some(id) = parse_id(id) else {
            return Ok(false);
        };
        let result = sqlx::query("DELETE FROM accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, page: u32, limit: u32) -> Result<AccountPage, StoreError> {
        let offset = i64::try_from(page_offset(page, limit)).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts \
             ORDER BY created_at DESC, id DESC \
             LIMIT $1 OFFSET $2"
        ))
        .bind(i64::from(limit))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM accounts")
            .fetch_one(&self.pool)
            .await?;

        let items = rows
            .into_iter()
            .map(from_row)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(AccountPage {
            items,
            total: u64::try_from(total).unwrap_or(0),
        })
    }

    async fn ping(&self) -> bool {
        sqlx::query("SELECT 1").execute(&self.pool).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(role: &str) -> AccountRow {
        let now = Utc::now();
        (
            "0190a3c4-0000-7000-8000-000000000000".into(),
            "Ada".into(),
            "ada@example.com".into(),
            role.into(),
            "hash".into(),
            now,
            now,
        )
    }

    #[test]
    fn from_row_parses_role() {
        let account = from_row(row("instructor")).unwrap();
        assert_eq!(account.role, Role::Instructor);
        assert_eq!(account.email, "ada@example.com");
    }

    #[test]
    fn from_row_rejects_unknown_role() {
        let err = from_row(row("admin")).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }
}
