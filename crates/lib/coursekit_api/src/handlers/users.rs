//! Account CRUD request handlers.

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;

use crate::AppState;
use crate::error::AppResult;
use crate::models::{
    AccountListResponse, AccountView, CreateUserRequest, ListUsersQuery, UpdateUserRequest,
};

/// `GET /api/users` — paginated account list, newest first.
pub async fn list_users_handler(
    State(state): State<AppState>,
    Query(query): Query<ListUsersQuery>,
) -> AppResult<Json<AccountListResponse>> {
    let (page, limit) = (query.page(), query.limit());
    let result = state.auth.list_accounts(page, limit).await?;
    let items = result.items.into_iter().map(AccountView::from).collect();
    Ok(Json(AccountListResponse::new(items, result.total, page, limit)))
}

/// `GET /api/users/{id}`
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<AccountView>> {
    let account = state.auth.get_account(&id).await?;
    Ok(Json(account.into()))
}

/// `POST /api/users` — instructor creates an account with any role.
pub async fn create_user_handler(
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<AccountView>)> {
    let account = state.auth.create_account(body.into()).await?;
    Ok((StatusCode::CREATED, Json(account.into())))
}

/// `PATCH /api/users/{id}`
pub async fn update_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<UpdateUserRequest>,
) -> AppResult<Json<AccountView>> {
    let account = state.auth.update_account(&id, body.into()).await?;
    Ok(Json(account.into()))
}

/// `DELETE /api/users/{id}`
pub async fn delete_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    state.auth.delete_account(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
