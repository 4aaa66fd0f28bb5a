//! Decoding of SQLite failures into the shared error taxonomy.
//!
//! This is the only place that inspects SQLite result codes.

use rusqlite::{ErrorCode, ffi};
use streamfair_core::Error;

/// Classify a raw `rusqlite` error.
pub fn classify(err: rusqlite::Error) -> Error {
  let rusqlite::Error::SqliteFailure(failure, message) = &err else {
    return Error::internal(err);
  };
  let detail = message.clone().unwrap_or_else(|| failure.to_string());
  let (code, extended_code) = (failure.code, failure.extended_code);

  match code {
    ErrorCode::ConstraintViolation => match extended_code {
      ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
        Error::DuplicateAssociation(detail)
      }
      ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Error::ConstraintViolation(detail),
      _ => Error::internal(err),
    },
    ErrorCode::CannotOpen | ErrorCode::NotADatabase | ErrorCode::SystemIoFailure => {
      Error::Connectivity(detail)
    }
    _ => Error::internal(err),
  }
}

/// Classify an error surfaced by the `tokio_rusqlite` connection thread.
pub fn classify_call(err: tokio_rusqlite::Error) -> Error {
  match err {
    tokio_rusqlite::Error::Rusqlite(e) => classify(e),
    tokio_rusqlite::Error::ConnectionClosed => {
      Error::Connectivity("connection closed".to_owned())
    }
    // `Close` carries the connection, which is not `Sync`.
    other => Error::internal(other.to_string()),
  }
}

/// `.classify()` on statement results, used inside units of work.
pub(crate) trait SqlResultExt<T> {
  fn classify(self) -> streamfair_core::Result<T>;
}

impl<T> SqlResultExt<T> for rusqlite::Result<T> {
  fn classify(self) -> streamfair_core::Result<T> { self.map_err(classify) }
}
