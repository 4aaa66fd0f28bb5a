//! The `CatalogStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g.
//! `streamfair-store-sqlite`). Adapters depend on this abstraction, not on any
//! concrete backend. Every mutating method runs as a single unit of work: it
//! either persists all of its rows or none of them.
//!
//! Backends report failures through the shared [`Error`](crate::Error)
//! taxonomy, already decoded from any vendor-specific error codes.

use std::{future::Future, time::Duration};

use crate::{
  Result,
  account::{Account, AccountType, AccountUpdate, AccountWithTypes, NewAccount},
  song::{Song, SongAggregate, SongDetail, SongDraft, SongRevision},
};

// ─── Query type ──────────────────────────────────────────────────────────────

/// Limit/offset pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
  pub limit:  u32,
  pub offset: u32,
}

impl Default for Page {
  fn default() -> Self { Self { limit: 100, offset: 0 } }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a Streamfair catalog backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  // ── Account types ─────────────────────────────────────────────────────

  /// Insert every entry of `catalog` whose id is not yet persisted.
  /// Returns the number of inserted rows.
  fn seed_account_types(
    &self,
    catalog: Vec<AccountType>,
  ) -> impl Future<Output = Result<usize>> + Send + '_;

  fn list_account_types(
    &self,
    page: Page,
  ) -> impl Future<Output = Result<Vec<AccountType>>> + Send + '_;

  fn get_account_type(
    &self,
    type_id: i64,
  ) -> impl Future<Output = Result<Option<AccountType>>> + Send + '_;

  /// The account types `account_id` is a member of.
  fn account_types_for_account(
    &self,
    account_id: i64,
  ) -> impl Future<Output = Result<Vec<AccountType>>> + Send + '_;

  // ── Accounts ──────────────────────────────────────────────────────────

  /// Create an account and its memberships in one unit of work.
  ///
  /// Fails with `ConstraintViolation` if a type id does not exist and with
  /// `DuplicateAssociation` if a type id is repeated; in both cases nothing
  /// is persisted.
  fn create_account(
    &self,
    account: NewAccount,
    type_ids: Vec<i64>,
  ) -> impl Future<Output = Result<AccountWithTypes>> + Send + '_;

  /// Delete an account and all its memberships in one unit of work.
  fn delete_account(&self, account_id: i64) -> impl Future<Output = Result<()>> + Send + '_;

  /// Retrieve an account by id. Returns `None` if not found.
  fn get_account(
    &self,
    account_id: i64,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  fn get_account_by_owner(
    &self,
    owner: String,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  fn list_accounts(
    &self,
    owner: String,
    page: Page,
  ) -> impl Future<Output = Result<Vec<Account>>> + Send + '_;

  fn update_account(
    &self,
    account_id: i64,
    update: AccountUpdate,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  // ── Songs ─────────────────────────────────────────────────────────────

  /// Create a song aggregate.
  ///
  /// Rejects with `Forbidden` unless the account can publish, and with
  /// `Conflict` if an equivalent draft was already ingested.
  fn create_song(
    &self,
    draft: SongDraft,
  ) -> impl Future<Output = Result<SongAggregate>> + Send + '_;

  /// Replace a song's scalar fields and resynchronise all of its credits.
  fn update_song(
    &self,
    song_id: i64,
    revision: SongRevision,
  ) -> impl Future<Output = Result<SongAggregate>> + Send + '_;

  /// Remove a song and every credit association referencing it.
  fn delete_song(
    &self,
    account_id: i64,
    song_id: i64,
  ) -> impl Future<Output = Result<()>> + Send + '_;

  /// Materialise a song with its credit rows. Returns `None` if not found.
  fn get_song(&self, song_id: i64)
  -> impl Future<Output = Result<Option<SongDetail>>> + Send + '_;

  /// Song rows ordered by id, without their credits.
  fn list_songs(&self, page: Page) -> impl Future<Output = Result<Vec<Song>>> + Send + '_;

  // ── Health ────────────────────────────────────────────────────────────

  /// Run a trivial query through the transactional machinery, bounded by
  /// `timeout`.
  fn ping(&self, timeout: Duration) -> impl Future<Output = Result<()>> + Send + '_;
}
