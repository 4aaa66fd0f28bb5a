//! The SQLite implementation of [`CatalogStore`].

use std::{path::Path, time::Duration};

use rusqlite::TransactionBehavior;
use streamfair_core::{
  Result,
  account::{Account, AccountType, AccountUpdate, AccountWithTypes, NewAccount},
  song::{Song, SongAggregate, SongDetail, SongDraft, SongRevision},
  store::{CatalogStore, Page},
};

use crate::{Queries, accounts, error::classify_call, health, schema::SCHEMA, songs};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Streamfair catalog backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await.map_err(classify_call)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory()
      .await
      .map_err(classify_call)?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Shut down the connection thread. Every clone of this store reports
  /// `Connectivity` afterwards.
  pub async fn close(self) -> Result<()> { self.conn.close().await.map_err(classify_call) }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await
      .map_err(classify_call)
  }

  /// Run `work` as one unit of work.
  ///
  /// `work` receives a [`Queries`] bound to a fresh transaction. The
  /// transaction commits if `work` returns `Ok`; otherwise it is rolled back
  /// and `work`'s error is returned as is. Nothing `work` wrote is visible to
  /// other callers until the commit.
  ///
  /// Not reentrant: `work` runs on the connection thread, so it must not call
  /// back into the store.
  pub async fn execute<T, F>(&self, work: F) -> Result<T>
  where
    F: FnOnce(&Queries<'_>) -> Result<T> + Send + 'static,
    T: Send + 'static,
  {
    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match work(&Queries::new(&tx)) {
          Ok(value) => {
            tx.commit()?;
            Ok(Ok(value))
          }
          Err(err) => {
            tracing::debug!(error = %err, "rolling back unit of work");
            if let Err(rollback) = tx.rollback() {
              tracing::warn!(error = %rollback, "rollback failed");
            }
            Ok(Err(err))
          }
        }
      })
      .await
      .map_err(classify_call)?
  }
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  // ── Account types ─────────────────────────────────────────────────────────

  async fn seed_account_types(&self, catalog: Vec<AccountType>) -> Result<usize> {
    accounts::seed_types(self, catalog).await
  }

  async fn list_account_types(&self, page: Page) -> Result<Vec<AccountType>> {
    self.execute(move |q| q.list_account_types(page)).await
  }

  async fn get_account_type(&self, type_id: i64) -> Result<Option<AccountType>> {
    self.execute(move |q| q.get_account_type(type_id)).await
  }

  async fn account_types_for_account(&self, account_id: i64) -> Result<Vec<AccountType>> {
    self
      .execute(move |q| q.account_types_for_account(account_id))
      .await
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn create_account(
    &self,
    account: NewAccount,
    type_ids: Vec<i64>,
  ) -> Result<AccountWithTypes> {
    accounts::create(self, account, type_ids).await
  }

  async fn delete_account(&self, account_id: i64) -> Result<()> {
    accounts::delete(self, account_id).await
  }

  async fn get_account(&self, account_id: i64) -> Result<Option<Account>> {
    self.execute(move |q| q.get_account(account_id)).await
  }

  async fn get_account_by_owner(&self, owner: String) -> Result<Option<Account>> {
    self.execute(move |q| q.get_account_by_owner(&owner)).await
  }

  async fn list_accounts(&self, owner: String, page: Page) -> Result<Vec<Account>> {
    self.execute(move |q| q.list_accounts(&owner, page)).await
  }

  async fn update_account(&self, account_id: i64, update: AccountUpdate) -> Result<Account> {
    accounts::update(self, account_id, update).await
  }

  // ── Songs ─────────────────────────────────────────────────────────────────

  async fn create_song(&self, draft: SongDraft) -> Result<SongAggregate> {
    songs::create(self, draft).await
  }

  async fn update_song(&self, song_id: i64, revision: SongRevision) -> Result<SongAggregate> {
    songs::update(self, song_id, revision).await
  }

  async fn delete_song(&self, account_id: i64, song_id: i64) -> Result<()> {
    songs::delete(self, account_id, song_id).await
  }

  async fn get_song(&self, song_id: i64) -> Result<Option<SongDetail>> {
    songs::get(self, song_id).await
  }

  async fn list_songs(&self, page: Page) -> Result<Vec<Song>> {
    self.execute(move |q| q.list_songs(page)).await
  }

  // ── Health ────────────────────────────────────────────────────────────────

  async fn ping(&self, timeout: Duration) -> Result<()> {
    health::ping(self, timeout).await
  }
}
