//! Handlers for `/accounts` and `/account-types` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/accounts` | Body: `{"owner":"alice","type_ids":[2,4]}` |
//! | `GET`    | `/accounts?owner=<owner>` | Optional `limit`, `offset` |
//! | `GET`    | `/accounts/:id` | Account plus its account types |
//! | `GET`    | `/accounts/owner/:owner` | Same shape as by id |
//! | `PUT`    | `/accounts/:id` | Replaces avatar and counters |
//! | `DELETE` | `/accounts/:id` | Removes account and memberships |
//! | `GET`    | `/account-types` | The seeded catalog |
//! | `GET`    | `/account-types/:id` | |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use streamfair_core::{
  account::{Account, AccountType, AccountUpdate, NewAccount},
  store::{CatalogStore, Page},
};

use crate::{ApiState, error::ApiError};

/// An account with its account-type rows.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccountResponse {
  pub account:       Account,
  pub account_types: Vec<AccountType>,
}

async fn with_types<S: CatalogStore>(
  store: &S,
  account: Account,
) -> Result<AccountResponse, ApiError> {
  let account_types = store.account_types_for_account(account.id).await?;
  Ok(AccountResponse { account, account_types })
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  #[serde(flatten)]
  pub account:  NewAccount,
  #[serde(default)]
  pub type_ids: Vec<i64>,
}

/// `POST /accounts`
pub async fn create<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let created = state.store.create_account(body.account, body.type_ids).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

// ─── Read ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub owner:  String,
  pub limit:  Option<u32>,
  pub offset: Option<u32>,
}

/// `GET /accounts?owner=<owner>[&limit=<n>][&offset=<n>]`
pub async fn list<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Account>>, ApiError> {
  let defaults = Page::default();
  let page = Page {
    limit:  params.limit.unwrap_or(defaults.limit),
    offset: params.offset.unwrap_or(defaults.offset),
  };
  Ok(Json(state.store.list_accounts(params.owner, page).await?))
}

/// `GET /accounts/:id`
pub async fn get_one<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<AccountResponse>, ApiError> {
  let account = state
    .store
    .get_account(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("account {id} not found")))?;
  Ok(Json(with_types(state.store.as_ref(), account).await?))
}

/// `GET /accounts/owner/:owner`
pub async fn get_by_owner<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(owner): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
  let account = state
    .store
    .get_account_by_owner(owner.clone())
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("no account owned by {owner}")))?;
  Ok(Json(with_types(state.store.as_ref(), account).await?))
}

/// `GET /account-types`
pub async fn list_types<S: CatalogStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<AccountType>>, ApiError> {
  Ok(Json(state.store.list_account_types(Page::default()).await?))
}

/// `GET /account-types/:id`
pub async fn get_type<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<AccountType>, ApiError> {
  let account_type = state
    .store
    .get_account_type(id)
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("account type {id} not found")))?;
  Ok(Json(account_type))
}

// ─── Update / delete ──────────────────────────────────────────────────────────

/// `PUT /accounts/:id`
pub async fn update<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<AccountUpdate>,
) -> Result<Json<Account>, ApiError> {
  Ok(Json(state.store.update_account(id, body).await?))
}

/// `DELETE /accounts/:id`
pub async fn delete<S: CatalogStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
  state.store.delete_account(id).await?;
  Ok(StatusCode::NO_CONTENT)
}
