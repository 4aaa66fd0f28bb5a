//! [`Queries`]: one typed method per row-level statement.
//!
//! A `Queries` borrows the connection of an open transaction; it is only
//! handed out by [`SqliteStore::execute`](crate::SqliteStore::execute), so
//! every statement below participates in the caller's unit of work.

use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension as _, params};
use streamfair_core::{
  Result,
  account::{Account, AccountType, AccountUpdate, NewAccount},
  fingerprint::Fingerprint,
  song::{NewSong, Song, SongUpdate},
  store::Page,
};

use crate::{
  encode::{
    ACCOUNT_COLUMNS, ACCOUNT_TYPE_COLUMNS, RawAccount, RawAccountType, RawSong,
    SONG_COLUMNS, encode_date, encode_dt,
  },
  error::SqlResultExt as _,
};

/// Transaction-scoped statement handle.
pub struct Queries<'c> {
  pub(crate) conn: &'c rusqlite::Connection,
}

impl<'c> Queries<'c> {
  pub(crate) fn new(conn: &'c rusqlite::Connection) -> Self { Self { conn } }

  // ── Health ────────────────────────────────────────────────────────────

  pub fn select_one(&self) -> Result<i64> {
    self.conn.query_row("SELECT 1", [], |r| r.get(0)).classify()
  }

  // ── Accounts ──────────────────────────────────────────────────────────

  pub fn create_account(&self, input: &NewAccount, now: DateTime<Utc>) -> Result<Account> {
    let at = encode_dt(now);
    let raw = self
      .conn
      .query_row(
        &format!(
          "INSERT INTO accounts (owner, avatar_uri, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?3)
           RETURNING {ACCOUNT_COLUMNS}"
        ),
        params![input.owner, input.avatar_uri, at],
        RawAccount::from_row,
      )
      .classify()?;
    raw.into_account()
  }

  pub fn get_account(&self, id: i64) -> Result<Option<Account>> {
    self
      .conn
      .query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = ?1"),
        params![id],
        RawAccount::from_row,
      )
      .optional()
      .classify()?
      .map(RawAccount::into_account)
      .transpose()
  }

  /// The oldest account owned by `owner`.
  pub fn get_account_by_owner(&self, owner: &str) -> Result<Option<Account>> {
    self
      .conn
      .query_row(
        &format!("SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE owner = ?1 ORDER BY id LIMIT 1"),
        params![owner],
        RawAccount::from_row,
      )
      .optional()
      .classify()?
      .map(RawAccount::into_account)
      .transpose()
  }

  pub fn list_accounts(&self, owner: &str, page: Page) -> Result<Vec<Account>> {
    let mut stmt = self
      .conn
      .prepare(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE owner = ?1 ORDER BY id LIMIT ?2 OFFSET ?3"
      ))
      .classify()?;
    let raws = stmt
      .query_map(params![owner, page.limit, page.offset], RawAccount::from_row)
      .classify()?
      .collect::<rusqlite::Result<Vec<_>>>()
      .classify()?;
    raws.into_iter().map(RawAccount::into_account).collect()
  }

  /// Returns `None` if no account has `id`.
  pub fn update_account(
    &self,
    id: i64,
    update: &AccountUpdate,
    now: DateTime<Utc>,
  ) -> Result<Option<Account>> {
    self
      .conn
      .query_row(
        &format!(
          "UPDATE accounts
           SET avatar_uri = ?2, plays = ?3, likes = ?4, follows = ?5, shares = ?6,
               updated_at = ?7
           WHERE id = ?1
           RETURNING {ACCOUNT_COLUMNS}"
        ),
        params![
          id,
          update.avatar_uri,
          update.plays,
          update.likes,
          update.follows,
          update.shares,
          encode_dt(now),
        ],
        RawAccount::from_row,
      )
      .optional()
      .classify()?
      .map(RawAccount::into_account)
      .transpose()
  }

  /// Returns the number of deleted rows (0 or 1).
  pub fn delete_account(&self, id: i64) -> Result<usize> {
    self.conn.execute("DELETE FROM accounts WHERE id = ?1", params![id]).classify()
  }

  // ── Account types ─────────────────────────────────────────────────────

  pub fn create_account_type(&self, t: &AccountType) -> Result<()> {
    let permissions = serde_json::to_string(&t.permissions)?;
    self
      .conn
      .execute(
        "INSERT INTO account_types
           (id, description, permissions, is_artist, is_producer, is_writer, is_label)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
          t.id,
          t.description,
          permissions,
          t.is_artist,
          t.is_producer,
          t.is_writer,
          t.is_label,
        ],
      )
      .classify()?;
    Ok(())
  }

  pub fn get_account_type(&self, id: i64) -> Result<Option<AccountType>> {
    self
      .conn
      .query_row(
        &format!("SELECT {ACCOUNT_TYPE_COLUMNS} FROM account_types WHERE id = ?1"),
        params![id],
        RawAccountType::from_row,
      )
      .optional()
      .classify()?
      .map(RawAccountType::into_account_type)
      .transpose()
  }

  pub fn list_account_types(&self, page: Page) -> Result<Vec<AccountType>> {
    let mut stmt = self
      .conn
      .prepare(&format!(
        "SELECT {ACCOUNT_TYPE_COLUMNS} FROM account_types ORDER BY id LIMIT ?1 OFFSET ?2"
      ))
      .classify()?;
    let raws = stmt
      .query_map(params![page.limit, page.offset], RawAccountType::from_row)
      .classify()?
      .collect::<rusqlite::Result<Vec<_>>>()
      .classify()?;
    raws.into_iter().map(RawAccountType::into_account_type).collect()
  }

  /// Account-type rows joined through the membership table.
  pub fn account_types_for_account(&self, account_id: i64) -> Result<Vec<AccountType>> {
    let mut stmt = self
      .conn
      .prepare(
        "SELECT t.id, t.description, t.permissions,
                t.is_artist, t.is_producer, t.is_writer, t.is_label
         FROM account_types t
         JOIN accounts_account_types j ON j.account_type_id = t.id
         WHERE j.account_id = ?1
         ORDER BY t.id",
      )
      .classify()?;
    let raws = stmt
      .query_map(params![account_id], RawAccountType::from_row)
      .classify()?
      .collect::<rusqlite::Result<Vec<_>>>()
      .classify()?;
    raws.into_iter().map(RawAccountType::into_account_type).collect()
  }

  // ── Songs ─────────────────────────────────────────────────────────────

  pub fn create_song(&self, input: &NewSong, now: DateTime<Utc>) -> Result<Song> {
    let raw = self
      .conn
      .query_row(
        &format!(
          "INSERT INTO songs
             (title, duration_secs, release_date, cover_uri, audio_uri, created_at, updated_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)
           RETURNING {SONG_COLUMNS}"
        ),
        params![
          input.title,
          input.duration_secs,
          encode_date(input.release_date),
          input.cover_uri,
          input.audio_uri,
          encode_dt(now),
        ],
        RawSong::from_row,
      )
      .classify()?;
    raw.into_song()
  }

  pub fn get_song(&self, id: i64) -> Result<Option<Song>> {
    self
      .conn
      .query_row(
        &format!("SELECT {SONG_COLUMNS} FROM songs WHERE id = ?1"),
        params![id],
        RawSong::from_row,
      )
      .optional()
      .classify()?
      .map(RawSong::into_song)
      .transpose()
  }

  pub fn list_songs(&self, page: Page) -> Result<Vec<Song>> {
    let mut stmt = self
      .conn
      .prepare(&format!("SELECT {SONG_COLUMNS} FROM songs ORDER BY id LIMIT ?1 OFFSET ?2"))
      .classify()?;
    let raws = stmt
      .query_map(params![page.limit, page.offset], RawSong::from_row)
      .classify()?
      .collect::<rusqlite::Result<Vec<_>>>()
      .classify()?;
    raws.into_iter().map(RawSong::into_song).collect()
  }

  /// Returns `None` if no song has `id`.
  pub fn update_song(
    &self,
    id: i64,
    update: &SongUpdate,
    now: DateTime<Utc>,
  ) -> Result<Option<Song>> {
    self
      .conn
      .query_row(
        &format!(
          "UPDATE songs
           SET title = ?2, duration_secs = ?3, release_date = ?4, cover_uri = ?5,
               audio_uri = ?6, plays = ?7, likes = ?8, shares = ?9, updated_at = ?10
           WHERE id = ?1
           RETURNING {SONG_COLUMNS}"
        ),
        params![
          id,
          update.title,
          update.duration_secs,
          encode_date(update.release_date),
          update.cover_uri,
          update.audio_uri,
          update.plays,
          update.likes,
          update.shares,
          encode_dt(now),
        ],
        RawSong::from_row,
      )
      .optional()
      .classify()?
      .map(RawSong::into_song)
      .transpose()
  }

  /// Returns the number of deleted rows (0 or 1).
  pub fn delete_song(&self, id: i64) -> Result<usize> {
    self.conn.execute("DELETE FROM songs WHERE id = ?1", params![id]).classify()
  }

  // ── Content fingerprints ──────────────────────────────────────────────

  /// Record `fp` as accepted. Returns `true` only the first time a given
  /// fingerprint is admitted; the primary key makes this a single atomic
  /// check-and-set.
  pub fn admit_fingerprint(&self, fp: &Fingerprint, now: DateTime<Utc>) -> Result<bool> {
    let inserted = self
      .conn
      .execute(
        "INSERT INTO content_fingerprints (hash, accepted_at) VALUES (?1, ?2)
         ON CONFLICT(hash) DO NOTHING",
        params![fp.to_hex(), encode_dt(now)],
      )
      .classify()?;
    Ok(inserted == 1)
  }

  #[cfg(test)]
  pub(crate) fn fingerprint_exists(&self, fp: &Fingerprint) -> Result<bool> {
    Ok(
      self
        .conn
        .query_row(
          "SELECT 1 FROM content_fingerprints WHERE hash = ?1",
          params![fp.to_hex()],
          |_| Ok(true),
        )
        .optional()
        .classify()?
        .unwrap_or(false),
    )
  }
}
