//! Credit rows: insert-or-reuse by normalized name, and per-song reads.
//!
//! Reuse policy: each credit table has a UNIQUE `name_key` (trimmed,
//! lowercased name or title). Resolving a credit inserts it when the key is
//! new and otherwise returns the existing row's id, leaving that row's
//! descriptive fields untouched.

use rusqlite::{OptionalExtension as _, params};
use streamfair_core::{
  Error, Result,
  credit::{
    Credit, CreditFields, CreditIds, CreditKind, CreditLists, Credits, NewAlbum, NewArtist,
    NewGenre, NewLabel, NewProducer, NewWriter,
  },
};

use crate::{Association, Queries, error::SqlResultExt as _};

/// Table-level knowledge for one credit payload type.
pub(crate) trait CreditRecord: CreditFields + Sized {
  const TABLE: &'static str;
  /// Data columns after `id`, in `read` order.
  const COLUMNS: &'static str;

  /// Insert the row under `name_key` unless the key exists.
  fn insert_if_absent(
    &self,
    conn: &rusqlite::Connection,
    name_key: &str,
  ) -> rusqlite::Result<usize>;

  /// Build from a row whose column 0 is `id` followed by [`Self::COLUMNS`].
  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self>;
}

impl CreditRecord for NewGenre {
  const COLUMNS: &'static str = "name, description";
  const TABLE: &'static str = "genres";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO genres (name_key, name, description) VALUES (?1, ?2, ?3)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.name, self.description],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { name: row.get(1)?, description: row.get(2)? })
  }
}

impl CreditRecord for NewArtist {
  const COLUMNS: &'static str = "name, bio, country_code";
  const TABLE: &'static str = "artists";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO artists (name_key, name, bio, country_code) VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.name, self.bio, self.country_code],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { name: row.get(1)?, bio: row.get(2)?, country_code: row.get(3)? })
  }
}

impl CreditRecord for NewAlbum {
  const COLUMNS: &'static str = "title, cover_uri";
  const TABLE: &'static str = "albums";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO albums (name_key, title, cover_uri) VALUES (?1, ?2, ?3)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.title, self.cover_uri],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { title: row.get(1)?, cover_uri: row.get(2)? })
  }
}

impl CreditRecord for NewProducer {
  const COLUMNS: &'static str = "name, country_code";
  const TABLE: &'static str = "producers";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO producers (name_key, name, country_code) VALUES (?1, ?2, ?3)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.name, self.country_code],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { name: row.get(1)?, country_code: row.get(2)? })
  }
}

impl CreditRecord for NewWriter {
  const COLUMNS: &'static str = "name, country_code";
  const TABLE: &'static str = "writers";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO writers (name_key, name, country_code) VALUES (?1, ?2, ?3)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.name, self.country_code],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { name: row.get(1)?, country_code: row.get(2)? })
  }
}

impl CreditRecord for NewLabel {
  const COLUMNS: &'static str = "name, country_code, cover_uri";
  const TABLE: &'static str = "labels";

  fn insert_if_absent(&self, conn: &rusqlite::Connection, key: &str) -> rusqlite::Result<usize> {
    conn.execute(
      "INSERT INTO labels (name_key, name, country_code, cover_uri) VALUES (?1, ?2, ?3, ?4)
       ON CONFLICT(name_key) DO NOTHING",
      params![key, self.name, self.country_code, self.cover_uri],
    )
  }

  fn read(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { name: row.get(1)?, country_code: row.get(2)?, cover_uri: row.get(3)? })
  }
}

impl Queries<'_> {
  /// Insert `credit` unless a row with the same normalized name exists, and
  /// return the id of the row now carrying that name.
  pub(crate) fn resolve_credit<T: CreditRecord>(&self, credit: &T) -> Result<i64> {
    let key = credit.name_key();
    credit.insert_if_absent(self.conn, &key).classify()?;
    self
      .conn
      .query_row(
        &format!("SELECT id FROM {} WHERE name_key = ?1", T::TABLE),
        params![key],
        |r| r.get(0),
      )
      .optional()
      .classify()?
      .ok_or_else(|| Error::not_found(T::KIND.as_str(), key))
  }

  /// Resolve every entry of `list` and link it to `song_id`. Entries that
  /// resolve to an already linked row are skipped.
  fn attach_credits<T: CreditRecord>(
    &self,
    song_id: i64,
    list: &[T],
    ids: &mut Vec<i64>,
  ) -> Result<()> {
    let assoc = Association::for_credit(T::KIND);
    for credit in list {
      let id = self.resolve_credit(credit)?;
      if ids.contains(&id) {
        continue;
      }
      self.link(assoc, song_id, id)?;
      ids.push(id);
    }
    Ok(())
  }

  /// Resolve and link every credit in every category.
  pub(crate) fn attach_all_credits(&self, song_id: i64, lists: &CreditLists) -> Result<CreditIds> {
    let mut ids = CreditIds::default();
    self.attach_credits(song_id, &lists.genres, &mut ids.genres)?;
    self.attach_credits(song_id, &lists.artists, &mut ids.artists)?;
    self.attach_credits(song_id, &lists.albums, &mut ids.albums)?;
    self.attach_credits(song_id, &lists.producers, &mut ids.producers)?;
    self.attach_credits(song_id, &lists.writers, &mut ids.writers)?;
    self.attach_credits(song_id, &lists.labels, &mut ids.labels)?;
    Ok(ids)
  }

  /// Remove every credit association of `song_id`. Returns the number of
  /// removed junction rows.
  pub(crate) fn detach_all_credits(&self, song_id: i64) -> Result<usize> {
    let mut removed = 0;
    for kind in CreditKind::ALL {
      removed += self.unlink_all_by_left(Association::for_credit(kind), song_id)?;
    }
    Ok(removed)
  }

  /// Credit ids currently linked to `song_id`.
  pub fn credit_ids_for_song(&self, song_id: i64) -> Result<CreditIds> {
    let mut ids = CreditIds::default();
    for kind in CreditKind::ALL {
      *ids.get_mut(kind) = self.list_by_left(Association::for_credit(kind), song_id)?;
    }
    Ok(ids)
  }

  fn credits_of<T: CreditRecord>(&self, song_id: i64) -> Result<Vec<Credit<T>>> {
    let Association { table, left, right } = Association::for_credit(T::KIND);
    let sql = format!(
      "SELECT c.id, {cols} FROM {credit_table} c
       JOIN {table} j ON j.{right} = c.id
       WHERE j.{left} = ?1
       ORDER BY c.id",
      cols = T::COLUMNS
        .split(", ")
        .map(|c| format!("c.{c}"))
        .collect::<Vec<_>>()
        .join(", "),
      credit_table = T::TABLE,
    );
    let mut stmt = self.conn.prepare(&sql).classify()?;
    let rows = stmt
      .query_map(params![song_id], |row| Ok(Credit { id: row.get(0)?, fields: T::read(row)? }))
      .classify()?
      .collect::<rusqlite::Result<Vec<_>>>()
      .classify()?;
    Ok(rows)
  }

  /// Credit rows linked to `song_id`, per category.
  pub(crate) fn credits_for_song(&self, song_id: i64) -> Result<Credits> {
    Ok(Credits {
      genres:    self.credits_of(song_id)?,
      artists:   self.credits_of(song_id)?,
      albums:    self.credits_of(song_id)?,
      producers: self.credits_of(song_id)?,
      writers:   self.credits_of(song_id)?,
      labels:    self.credits_of(song_id)?,
    })
  }
}
