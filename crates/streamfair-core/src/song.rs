//! Songs and the song aggregate (song plus its creative credits).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::credit::{CreditIds, CreditLists, Credits, normalize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
  pub id:            i64,
  pub title:         String,
  pub duration_secs: i64,
  pub release_date:  NaiveDate,
  pub cover_uri:     Option<String>,
  pub audio_uri:     String,
  pub plays:         i64,
  pub likes:         i64,
  pub shares:        i64,
  pub created_at:    DateTime<Utc>,
  pub updated_at:    DateTime<Utc>,
}

/// Scalar fields of a song to be created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSong {
  pub title:         String,
  pub duration_secs: i64,
  pub release_date:  NaiveDate,
  #[serde(default)]
  pub cover_uri:     Option<String>,
  pub audio_uri:     String,
}

impl NewSong {
  pub fn canonicalize(&mut self) {
    self.title = normalize(&self.title);
    self.audio_uri = normalize(&self.audio_uri);
    if let Some(uri) = &mut self.cover_uri {
      *uri = normalize(uri);
    }
  }
}

/// Scalar fields replaced by a song update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongUpdate {
  pub title:         String,
  pub duration_secs: i64,
  pub release_date:  NaiveDate,
  #[serde(default)]
  pub cover_uri:     Option<String>,
  pub audio_uri:     String,
  #[serde(default)]
  pub plays:         i64,
  #[serde(default)]
  pub likes:         i64,
  #[serde(default)]
  pub shares:        i64,
}

/// A song-creation request: the publishing account, the song's scalar fields
/// and one child-entity list per credit category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongDraft {
  pub account_id: i64,
  pub song:       NewSong,
  #[serde(default)]
  pub credits:    CreditLists,
}

/// A song-update request. Credits fully replace the song's current ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongRevision {
  pub account_id: i64,
  pub song:       SongUpdate,
  #[serde(default)]
  pub credits:    CreditLists,
}

/// The result of a song write: the persisted song plus the resolved credit ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongAggregate {
  pub song:    Song,
  pub credits: CreditIds,
}

/// Read model: a song with its credit rows materialised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SongDetail {
  pub song:    Song,
  pub credits: Credits,
}
