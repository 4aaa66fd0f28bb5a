//! Accounts and account types.
//!
//! An account belongs to one principal (`owner`) and holds zero or more
//! account-type memberships. Account types are a fixed catalog seeded at boot
//! and carry the capability flags used for authorization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Accounts ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
  pub id:         i64,
  pub owner:      String,
  pub avatar_uri: Option<String>,
  pub plays:      i64,
  pub likes:      i64,
  pub follows:    i64,
  pub shares:     i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Owner fields supplied when creating an account. Counters start at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
  pub owner:      String,
  #[serde(default)]
  pub avatar_uri: Option<String>,
}

/// Profile and counter fields replaced by an account update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
  #[serde(default)]
  pub avatar_uri: Option<String>,
  #[serde(default)]
  pub plays:      i64,
  #[serde(default)]
  pub likes:      i64,
  #[serde(default)]
  pub follows:    i64,
  #[serde(default)]
  pub shares:     i64,
}

/// An account together with the ids of the account types it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountWithTypes {
  pub account:  Account,
  pub type_ids: Vec<i64>,
}

// ─── Account types ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountType {
  pub id:          i64,
  pub description: String,
  /// Opaque JSON permission blob.
  pub permissions: serde_json::Value,
  pub is_artist:   bool,
  pub is_producer: bool,
  pub is_writer:   bool,
  pub is_label:    bool,
}

impl AccountType {
  /// Whether this type allows publishing songs.
  pub fn can_publish(&self) -> bool {
    self.is_artist || self.is_producer || self.is_writer || self.is_label
  }
}

/// Whether any of `types` carries a publishing capability.
pub fn has_publishing_capability(types: &[AccountType]) -> bool {
  types.iter().any(AccountType::can_publish)
}

pub const USER_ACCOUNT: i64 = 1;
pub const ARTIST_ACCOUNT: i64 = 2;
pub const PRODUCER_ACCOUNT: i64 = 3;
pub const WRITER_ACCOUNT: i64 = 4;
pub const LABEL_ACCOUNT: i64 = 5;

/// The fixed account-type catalog persisted at boot.
pub fn catalog() -> Vec<AccountType> {
  let restricted = serde_json::json!({
    "upload_songs": false, "upload_albums": false, "upload_playlists": false,
  });
  let publishing = serde_json::json!({
    "upload_songs": true, "upload_albums": true, "upload_playlists": true,
  });

  let entry = |id, description: &str, permissions: &serde_json::Value, flags: [bool; 4]| {
    AccountType {
      id,
      description: description.to_owned(),
      permissions: permissions.clone(),
      is_artist:   flags[0],
      is_producer: flags[1],
      is_writer:   flags[2],
      is_label:    flags[3],
    }
  };

  vec![
    entry(USER_ACCOUNT, "Default User Account Type", &restricted, [false, false, false, false]),
    entry(ARTIST_ACCOUNT, "Artist Account Type", &publishing, [true, false, false, false]),
    entry(PRODUCER_ACCOUNT, "Producer Account Type", &publishing, [false, true, false, false]),
    entry(WRITER_ACCOUNT, "Writer Account Type", &publishing, [false, false, true, false]),
    entry(LABEL_ACCOUNT, "Label Account Type", &publishing, [false, false, false, true]),
  ]
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn only_the_user_type_lacks_publishing_capability() {
    let types = catalog();
    assert_eq!(types.len(), 5);
    for t in &types {
      assert_eq!(t.can_publish(), t.id != USER_ACCOUNT, "type {}", t.id);
    }
  }

  #[test]
  fn capability_check_over_memberships() {
    let types = catalog();
    assert!(!has_publishing_capability(&[]));
    assert!(!has_publishing_capability(&types[..1]));
    assert!(has_publishing_capability(&types[..2]));
  }
}
