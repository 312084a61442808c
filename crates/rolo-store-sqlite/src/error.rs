//! Error type for `rolo-store-sqlite`.

use rolo_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(tokio_rusqlite::Error),

  /// A write collided with the UNIQUE constraint on `email` or
  /// `phone_number`. Carries the wire name of the field.
  #[error("a contact with this {0} already exists")]
  Duplicate(&'static str),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date parse error: {0}")]
  DateParse(String),

  #[error("cannot decode column {column}: {value:?}")]
  Decode {
    column: &'static str,
    value:  String,
  },
}

impl From<tokio_rusqlite::Error> for Error {
  fn from(e: tokio_rusqlite::Error) -> Self {
    if let tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(
      failure,
      Some(msg),
    )) = &e
      && failure.code == rusqlite::ErrorCode::ConstraintViolation
    {
      // "UNIQUE constraint failed: contacts.email"
      if msg.ends_with("contacts.email") {
        return Self::Duplicate("email");
      }
      if msg.ends_with("contacts.phone_number") {
        return Self::Duplicate("phoneNumber");
      }
    }
    Self::Database(e)
  }
}

impl StoreError for Error {
  fn duplicate_field(&self) -> Option<&'static str> {
    match self {
      Self::Duplicate(field) => Some(*field),
      _ => None,
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
