//! Many-to-many junction management.
//!
//! An [`Association`] names a junction table and its two foreign-key columns.
//! The operations live on [`Queries`] so they run inside the caller's unit of
//! work.
//!
//! - `link` relies on the junction's foreign keys and composite primary key:
//!   a missing parent surfaces as `ConstraintViolation`, an existing pair as
//!   `DuplicateAssociation`.
//! - `unlink` is idempotent; removing a pair that does not exist succeeds.
//! - List operations return ids of the other side in ascending order.

use rusqlite::params;
use streamfair_core::{Result, credit::CreditKind};

use crate::{Queries, error::SqlResultExt as _};

/// A junction table between a left and a right entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
  pub table: &'static str,
  pub left:  &'static str,
  pub right: &'static str,
}

impl Association {
  pub const ACCOUNT_TYPES: Self = Self {
    table: "accounts_account_types",
    left:  "account_id",
    right: "account_type_id",
  };
  pub const SONG_GENRES: Self = Self { table: "songs_genres", left: "song_id", right: "genre_id" };
  pub const SONG_ARTISTS: Self = Self {
    table: "songs_artists",
    left:  "song_id",
    right: "artist_id",
  };
  pub const SONG_ALBUMS: Self = Self { table: "songs_albums", left: "song_id", right: "album_id" };
  pub const SONG_PRODUCERS: Self = Self {
    table: "songs_producers",
    left:  "song_id",
    right: "producer_id",
  };
  pub const SONG_WRITERS: Self = Self {
    table: "songs_writers",
    left:  "song_id",
    right: "writer_id",
  };
  pub const SONG_LABELS: Self = Self { table: "songs_labels", left: "song_id", right: "label_id" };

  /// The song-side junction for a credit category.
  pub fn for_credit(kind: CreditKind) -> Self {
    match kind {
      CreditKind::Genre => Self::SONG_GENRES,
      CreditKind::Artist => Self::SONG_ARTISTS,
      CreditKind::Album => Self::SONG_ALBUMS,
      CreditKind::Producer => Self::SONG_PRODUCERS,
      CreditKind::Writer => Self::SONG_WRITERS,
      CreditKind::Label => Self::SONG_LABELS,
    }
  }
}

impl Queries<'_> {
  pub fn link(&self, assoc: Association, left_id: i64, right_id: i64) -> Result<()> {
    let Association { table, left, right } = assoc;
    self
      .conn
      .execute(
        &format!("INSERT INTO {table} ({left}, {right}) VALUES (?1, ?2)"),
        params![left_id, right_id],
      )
      .classify()?;
    Ok(())
  }

  /// Returns the number of removed rows (0 or 1).
  pub fn unlink(&self, assoc: Association, left_id: i64, right_id: i64) -> Result<usize> {
    let Association { table, left, right } = assoc;
    self
      .conn
      .execute(
        &format!("DELETE FROM {table} WHERE {left} = ?1 AND {right} = ?2"),
        params![left_id, right_id],
      )
      .classify()
  }

  pub fn list_by_left(&self, assoc: Association, left_id: i64) -> Result<Vec<i64>> {
    let Association { table, left, right } = assoc;
    self.ids(
      &format!("SELECT {right} FROM {table} WHERE {left} = ?1 ORDER BY {right}"),
      left_id,
    )
  }

  pub fn list_by_right(&self, assoc: Association, right_id: i64) -> Result<Vec<i64>> {
    let Association { table, left, right } = assoc;
    self.ids(
      &format!("SELECT {left} FROM {table} WHERE {right} = ?1 ORDER BY {left}"),
      right_id,
    )
  }

  /// Returns the number of removed rows.
  pub fn unlink_all_by_left(&self, assoc: Association, left_id: i64) -> Result<usize> {
    let Association { table, left, .. } = assoc;
    self
      .conn
      .execute(&format!("DELETE FROM {table} WHERE {left} = ?1"), params![left_id])
      .classify()
  }

  /// Returns the number of removed rows.
  pub fn unlink_all_by_right(&self, assoc: Association, right_id: i64) -> Result<usize> {
    let Association { table, right, .. } = assoc;
    self
      .conn
      .execute(&format!("DELETE FROM {table} WHERE {right} = ?1"), params![right_id])
      .classify()
  }

  fn ids(&self, sql: &str, id: i64) -> Result<Vec<i64>> {
    let mut stmt = self.conn.prepare(sql).classify()?;
    let ids = stmt
      .query_map(params![id], |r| r.get(0))
      .classify()?
      .collect::<rusqlite::Result<Vec<i64>>>()
      .classify()?;
    Ok(ids)
  }
}
