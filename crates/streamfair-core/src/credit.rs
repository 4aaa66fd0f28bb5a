//! Creative-credit entities attached to songs.
//!
//! Six kinds exist (genre, artist, album, producer, writer, label). Each one
//! joins songs through its own junction table. Rows are shared between songs:
//! a credit is identified by its normalized name (see [`normalize`]).

use serde::{Deserialize, Serialize};

/// Trim and lowercase a free-text value.
pub fn normalize(s: &str) -> String { s.trim().to_lowercase() }

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditKind {
  Genre,
  Artist,
  Album,
  Producer,
  Writer,
  Label,
}

impl CreditKind {
  pub const ALL: [CreditKind; 6] = [
    Self::Genre,
    Self::Artist,
    Self::Album,
    Self::Producer,
    Self::Writer,
    Self::Label,
  ];

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Genre => "genre",
      Self::Artist => "artist",
      Self::Album => "album",
      Self::Producer => "producer",
      Self::Writer => "writer",
      Self::Label => "label",
    }
  }
}

/// Shared behaviour of the six credit payloads.
pub trait CreditFields {
  const KIND: CreditKind;

  /// The name (or title) the credit is identified by.
  fn display_name(&self) -> &str;

  /// Reuse key: the normalized display name.
  fn name_key(&self) -> String { normalize(self.display_name()) }

  /// Trim and lowercase every free-text field in place.
  fn canonicalize(&mut self);
}

fn canon(s: &mut String) { *s = normalize(s); }

fn canon_opt(s: &mut Option<String>) {
  if let Some(v) = s {
    canon(v);
  }
}

// ─── Payloads ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewGenre {
  pub name:        String,
  #[serde(default)]
  pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArtist {
  pub name:         String,
  #[serde(default)]
  pub bio:          Option<String>,
  pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAlbum {
  pub title:     String,
  #[serde(default)]
  pub cover_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProducer {
  pub name:         String,
  pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewWriter {
  pub name:         String,
  pub country_code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLabel {
  pub name:         String,
  pub country_code: String,
  #[serde(default)]
  pub cover_uri:    Option<String>,
}

impl CreditFields for NewGenre {
  const KIND: CreditKind = CreditKind::Genre;

  fn display_name(&self) -> &str { &self.name }

  fn canonicalize(&mut self) {
    canon(&mut self.name);
    canon_opt(&mut self.description);
  }
}

impl CreditFields for NewArtist {
  const KIND: CreditKind = CreditKind::Artist;

  fn display_name(&self) -> &str { &self.name }

  fn canonicalize(&mut self) {
    canon(&mut self.name);
    canon_opt(&mut self.bio);
    canon(&mut self.country_code);
  }
}

impl CreditFields for NewAlbum {
  const KIND: CreditKind = CreditKind::Album;

  fn display_name(&self) -> &str { &self.title }

  fn canonicalize(&mut self) {
    canon(&mut self.title);
    canon_opt(&mut self.cover_uri);
  }
}

impl CreditFields for NewProducer {
  const KIND: CreditKind = CreditKind::Producer;

  fn display_name(&self) -> &str { &self.name }

  fn canonicalize(&mut self) {
    canon(&mut self.name);
    canon(&mut self.country_code);
  }
}

impl CreditFields for NewWriter {
  const KIND: CreditKind = CreditKind::Writer;

  fn display_name(&self) -> &str { &self.name }

  fn canonicalize(&mut self) {
    canon(&mut self.name);
    canon(&mut self.country_code);
  }
}

impl CreditFields for NewLabel {
  const KIND: CreditKind = CreditKind::Label;

  fn display_name(&self) -> &str { &self.name }

  fn canonicalize(&mut self) {
    canon(&mut self.name);
    canon(&mut self.country_code);
    canon_opt(&mut self.cover_uri);
  }
}

// ─── Persisted rows ──────────────────────────────────────────────────────────

/// A persisted credit row: its surrogate id plus the stored fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credit<T> {
  pub id:     i64,
  #[serde(flatten)]
  pub fields: T,
}

// ─── Per-category collections ────────────────────────────────────────────────

/// The child-entity lists of a song aggregate, one per category. Any list
/// may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditLists {
  #[serde(default)]
  pub genres:    Vec<NewGenre>,
  #[serde(default)]
  pub artists:   Vec<NewArtist>,
  #[serde(default)]
  pub albums:    Vec<NewAlbum>,
  #[serde(default)]
  pub producers: Vec<NewProducer>,
  #[serde(default)]
  pub writers:   Vec<NewWriter>,
  #[serde(default)]
  pub labels:    Vec<NewLabel>,
}

impl CreditLists {
  pub fn canonicalize(&mut self) {
    self.genres.iter_mut().for_each(CreditFields::canonicalize);
    self.artists.iter_mut().for_each(CreditFields::canonicalize);
    self.albums.iter_mut().for_each(CreditFields::canonicalize);
    self.producers.iter_mut().for_each(CreditFields::canonicalize);
    self.writers.iter_mut().for_each(CreditFields::canonicalize);
    self.labels.iter_mut().for_each(CreditFields::canonicalize);
  }
}

/// Resolved credit ids per category, in the order they were linked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditIds {
  pub genres:    Vec<i64>,
  pub artists:   Vec<i64>,
  pub albums:    Vec<i64>,
  pub producers: Vec<i64>,
  pub writers:   Vec<i64>,
  pub labels:    Vec<i64>,
}

impl CreditIds {
  pub fn get(&self, kind: CreditKind) -> &[i64] {
    match kind {
      CreditKind::Genre => &self.genres,
      CreditKind::Artist => &self.artists,
      CreditKind::Album => &self.albums,
      CreditKind::Producer => &self.producers,
      CreditKind::Writer => &self.writers,
      CreditKind::Label => &self.labels,
    }
  }

  pub fn get_mut(&mut self, kind: CreditKind) -> &mut Vec<i64> {
    match kind {
      CreditKind::Genre => &mut self.genres,
      CreditKind::Artist => &mut self.artists,
      CreditKind::Album => &mut self.albums,
      CreditKind::Producer => &mut self.producers,
      CreditKind::Writer => &mut self.writers,
      CreditKind::Label => &mut self.labels,
    }
  }

  pub fn is_empty(&self) -> bool {
    CreditKind::ALL.iter().all(|k| self.get(*k).is_empty())
  }
}

/// Persisted credit rows per category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credits {
  pub genres:    Vec<Credit<NewGenre>>,
  pub artists:   Vec<Credit<NewArtist>>,
  pub albums:    Vec<Credit<NewAlbum>>,
  pub producers: Vec<Credit<NewProducer>>,
  pub writers:   Vec<Credit<NewWriter>>,
  pub labels:    Vec<Credit<NewLabel>>,
}
