//! Error taxonomy shared by every Streamfair crate.
//!
//! Storage backends decode their vendor-specific failures into this enum once,
//! at the storage boundary. Adapters branch on [`Error::kind`] and never look
//! at the underlying database error.

use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A referenced parent row does not exist.
  #[error("constraint violation: {0}")]
  ConstraintViolation(String),

  /// A uniqueness constraint rejected the write (e.g. a junction pair that
  /// already exists).
  #[error("duplicate association: {0}")]
  DuplicateAssociation(String),

  /// The write duplicates content that was already accepted.
  #[error("conflict: {0}")]
  Conflict(String),

  /// The account lacks a capability the operation requires.
  #[error("account {account_id} is not permitted to {action}")]
  Forbidden { account_id: i64, action: &'static str },

  #[error("{entity} {id} not found")]
  NotFound { entity: &'static str, id: String },

  #[error("operation timed out after {0:?}")]
  Timeout(Duration),

  #[error("database unreachable: {0}")]
  Connectivity(String),

  #[error("unexpected result: {0}")]
  UnexpectedResult(String),

  #[error("internal error: {0}")]
  Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Fieldless discriminant of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
  ConstraintViolation,
  DuplicateAssociation,
  Conflict,
  Forbidden,
  NotFound,
  Timeout,
  Connectivity,
  UnexpectedResult,
  Internal,
}

impl Error {
  pub fn kind(&self) -> ErrorKind {
    match self {
      Self::ConstraintViolation(_) => ErrorKind::ConstraintViolation,
      Self::DuplicateAssociation(_) => ErrorKind::DuplicateAssociation,
      Self::Conflict(_) => ErrorKind::Conflict,
      Self::Forbidden { .. } => ErrorKind::Forbidden,
      Self::NotFound { .. } => ErrorKind::NotFound,
      Self::Timeout(_) => ErrorKind::Timeout,
      Self::Connectivity(_) => ErrorKind::Connectivity,
      Self::UnexpectedResult(_) => ErrorKind::UnexpectedResult,
      Self::Internal(_) => ErrorKind::Internal,
    }
  }

  pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
    Self::NotFound { entity, id: id.to_string() }
  }

  pub fn internal(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
    Self::Internal(err.into())
  }
}

impl From<serde_json::Error> for Error {
  fn from(err: serde_json::Error) -> Self { Self::Internal(Box::new(err)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
