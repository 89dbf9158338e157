//! Request and response bodies.
//!
//! Wire names are camelCase. None of these types carry a password hash.

use coursekit_core::auth::service::{CreateAccount, UpdateAccount};
use coursekit_core::models::account::{Account, AccountSummary, Role};
use serde::{Deserialize, Serialize};

/// Default page size for account listings.
pub const DEFAULT_PAGE_LIMIT: u32 = 10;
/// Largest page size a client may request.
pub const MAX_PAGE_LIMIT: u32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub store_connected: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login/registration response. The refresh token travels in a cookie only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub user: AccountSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

/// `GET /auth/me` body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl From<Account> for ProfileResponse {
    fn from(account: Account) -> Self {
        Self {
            name: account.name,
            email: account.email,
            role: account.role,
        }
    }
}

/// Public account representation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Account> for AccountView {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            name: account.name,
            email: account.email,
            role: account.role,
            created_at: account.created_at.to_rfc3339(),
            updated_at: account.updated_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListUsersQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

impl ListUsersQuery {
    /// 1-based page, at least 1.
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size clamped to `1..=MAX_PAGE_LIMIT`.
    pub fn limit(&self) -> u32 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountListResponse {
    pub items: Vec<AccountView>,
    pub total: u64,
    pub page: u32,
    pub pages: u64,
}

impl AccountListResponse {
    pub fn new(items: Vec<AccountView>, total: u64, page: u32, limit: u32) -> Self {
        Self {
            items,
            total,
            page,
            pages: total.div_ceil(u64::from(limit)),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

impl From<CreateUserRequest> for CreateAccount {
    fn from(body: CreateUserRequest) -> Self {
        Self {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub password: Option<String>,
}

impl From<UpdateUserRequest> for UpdateAccount {
    fn from(body: UpdateUserRequest) -> Self {
        Self {
            name: body.name,
            email: body.email,
            role: body.role,
            password: body.password,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_defaults_and_clamps() {
        let q = ListUsersQuery::default();
        assert_eq!((q.page(), q.limit()), (1, DEFAULT_PAGE_LIMIT));

        let q = ListUsersQuery {
            page: Some(0),
            limit: Some(10_000),
        };
        assert_eq!((q.page(), q.limit()), (1, MAX_PAGE_LIMIT));

        let q = ListUsersQuery {
            page: Some(3),
            limit: Some(0),
        };
        assert_eq!((q.page(), q.limit()), (3, 1));
    }

    #[test]
    fn pages_round_up() {
        assert_eq!(AccountListResponse::new(vec![], 0, 1, 10).pages, 0);
        assert_eq!(AccountListResponse::new(vec![], 10, 1, 10).pages, 1);
        assert_eq!(AccountListResponse::new(vec![], 11, 1, 10).pages, 2);
    }

    #[test]
    fn login_response_uses_camel_case() {
        let body = LoginResponse {
            access_token: "abc".into(),
            user: AccountSummary {
                id: "1".into(),
                name: "Ada".into(),
                role: Role::Student,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["accessToken"], "abc");
        assert_eq!(json["user"]["role"], "student");
        assert!(json.get("refreshToken").is_none());
    }

    #[test]
    fn create_request_defaults_role_to_student() {
        let body: CreateUserRequest = serde_json::from_str(
            r#"{"name":"Ada","email":"ada@example.com","password":"password123"}"#,
        )
        .unwrap();
        assert_eq!(body.role, Role::Student);
    }
}
