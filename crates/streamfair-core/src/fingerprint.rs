//! Content fingerprints for song-creation requests.
//!
//! A fingerprint is the SHA-256 digest of the canonical JSON encoding of a
//! [`SongDraft`]. Canonicalization trims and lowercases every free-text field,
//! so requests differing only in whitespace or case hash identically.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{Result, song::SongDraft};

/// A normalized copy of a [`SongDraft`]. The original is never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CanonicalDraft(SongDraft);

impl CanonicalDraft {
  pub fn as_draft(&self) -> &SongDraft { &self.0 }
}

/// A 256-bit content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
  pub fn to_hex(&self) -> String { hex::encode(self.0) }
}

impl fmt::Display for Fingerprint {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.to_hex())
  }
}

/// Deep-copy `draft` and normalize every free-text field, including those of
/// each nested credit.
pub fn canonicalize(draft: &SongDraft) -> CanonicalDraft {
  let mut canonical = draft.clone();
  canonical.song.canonicalize();
  canonical.credits.canonicalize();
  CanonicalDraft(canonical)
}

/// Hash the canonical payload.
///
/// Field order follows struct declaration order, so the encoding is stable.
pub fn fingerprint(canonical: &CanonicalDraft) -> Result<Fingerprint> {
  let encoded = serde_json::to_vec(canonical)?;
  Ok(Fingerprint(Sha256::digest(&encoded).into()))
}

/// [`canonicalize`] then [`fingerprint`].
pub fn fingerprint_draft(draft: &SongDraft) -> Result<Fingerprint> {
  fingerprint(&canonicalize(draft))
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::{
    credit::{CreditLists, NewArtist, NewGenre, NewLabel},
    song::NewSong,
  };

  fn draft(title: &str, artist: &str) -> SongDraft {
    SongDraft {
      account_id: 7,
      song:       NewSong {
        title:         title.into(),
        duration_secs: 215,
        release_date:  NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        cover_uri:     Some("https://cdn.example.com/Cover.png".into()),
        audio_uri:     "https://cdn.example.com/song.flac".into(),
      },
      credits:    CreditLists {
        genres: vec![NewGenre { name: "Synthwave".into(), description: None }],
        artists: vec![NewArtist {
          name:         artist.into(),
          bio:          Some("  Plays Keys ".into()),
          country_code: "DE".into(),
        }],
        labels: vec![NewLabel {
          name:         "Night Records".into(),
          country_code: "de".into(),
          cover_uri:    None,
        }],
        ..Default::default()
      },
    }
  }

  #[test]
  fn canonicalize_does_not_mutate_input() {
    let original = draft(" My Song ", "Alice");
    let snapshot = original.clone();
    let canonical = canonicalize(&original);

    assert_eq!(original, snapshot);
    assert_eq!(canonical.as_draft().song.title, "my song");
    assert_eq!(canonical.as_draft().credits.artists[0].country_code, "de");
    assert_eq!(canonical.as_draft().credits.artists[0].bio.as_deref(), Some("plays keys"));
  }

  #[test]
  fn whitespace_and_case_do_not_change_fingerprint() {
    let a = fingerprint_draft(&draft(" My Song ", "Alice")).unwrap();
    let b = fingerprint_draft(&draft("my song", "  ALICE")).unwrap();
    assert_eq!(a, b);
  }

  #[test]
  fn different_content_changes_fingerprint() {
    let a = fingerprint_draft(&draft("My Song", "Alice")).unwrap();
    let b = fingerprint_draft(&draft("My Song", "Bob")).unwrap();
    assert_ne!(a, b);

    let mut other_account = draft("My Song", "Alice");
    other_account.account_id = 8;
    assert_ne!(a, fingerprint_draft(&other_account).unwrap());
  }

  #[test]
  fn hex_encoding_is_64_chars() {
    let fp = fingerprint_draft(&draft("x", "y")).unwrap();
    assert_eq!(fp.to_hex().len(), 64);
    assert_eq!(fp.to_string(), fp.to_hex());
  }
}
