//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD`, and the
//! account-type permission blob as compact JSON.

use chrono::{DateTime, NaiveDate, Utc};
use streamfair_core::{
  Error, Result,
  account::{Account, AccountType},
  song::Song,
};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::internal(format!("bad timestamp {s:?}: {e}")))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::internal(format!("bad date {s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const ACCOUNT_COLUMNS: &str =
  "id, owner, avatar_uri, plays, likes, follows, shares, created_at, updated_at";

/// Raw values read directly from an `accounts` row.
pub struct RawAccount {
  pub id:         i64,
  pub owner:      String,
  pub avatar_uri: Option<String>,
  pub plays:      i64,
  pub likes:      i64,
  pub follows:    i64,
  pub shares:     i64,
  pub created_at: String,
  pub updated_at: String,
}

impl RawAccount {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      owner:      row.get(1)?,
      avatar_uri: row.get(2)?,
      plays:      row.get(3)?,
      likes:      row.get(4)?,
      follows:    row.get(5)?,
      shares:     row.get(6)?,
      created_at: row.get(7)?,
      updated_at: row.get(8)?,
    })
  }

  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      id:         self.id,
      owner:      self.owner,
      avatar_uri: self.avatar_uri,
      plays:      self.plays,
      likes:      self.likes,
      follows:    self.follows,
      shares:     self.shares,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

pub const ACCOUNT_TYPE_COLUMNS: &str =
  "id, description, permissions, is_artist, is_producer, is_writer, is_label";

/// Raw values read directly from an `account_types` row.
pub struct RawAccountType {
  pub id:          i64,
  pub description: String,
  pub permissions: String,
  pub is_artist:   bool,
  pub is_producer: bool,
  pub is_writer:   bool,
  pub is_label:    bool,
}

impl RawAccountType {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      description: row.get(1)?,
      permissions: row.get(2)?,
      is_artist:   row.get(3)?,
      is_producer: row.get(4)?,
      is_writer:   row.get(5)?,
      is_label:    row.get(6)?,
    })
  }

  pub fn into_account_type(self) -> Result<AccountType> {
    Ok(AccountType {
      id:          self.id,
      description: self.description,
      permissions: serde_json::from_str(&self.permissions)?,
      is_artist:   self.is_artist,
      is_producer: self.is_producer,
      is_writer:   self.is_writer,
      is_label:    self.is_label,
    })
  }
}

pub const SONG_COLUMNS: &str = "id, title, duration_secs, release_date, cover_uri, audio_uri, \
                                plays, likes, shares, created_at, updated_at";

/// Raw values read directly from a `songs` row.
pub struct RawSong {
  pub id:            i64,
  pub title:         String,
  pub duration_secs: i64,
  pub release_date:  String,
  pub cover_uri:     Option<String>,
  pub audio_uri:     String,
  pub plays:         i64,
  pub likes:         i64,
  pub shares:        i64,
  pub created_at:    String,
  pub updated_at:    String,
}

impl RawSong {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:            row.get(0)?,
      title:         row.get(1)?,
      duration_secs: row.get(2)?,
      release_date:  row.get(3)?,
      cover_uri:     row.get(4)?,
      audio_uri:     row.get(5)?,
      plays:         row.get(6)?,
      likes:         row.get(7)?,
      shares:        row.get(8)?,
      created_at:    row.get(9)?,
      updated_at:    row.get(10)?,
    })
  }

  pub fn into_song(self) -> Result<Song> {
    Ok(Song {
      id:            self.id,
      title:         self.title,
      duration_secs: self.duration_secs,
      release_date:  decode_date(&self.release_date)?,
      cover_uri:     self.cover_uri,
      audio_uri:     self.audio_uri,
      plays:         self.plays,
      likes:         self.likes,
      shares:        self.shares,
      created_at:    decode_dt(&self.created_at)?,
      updated_at:    decode_dt(&self.updated_at)?,
    })
  }
}
