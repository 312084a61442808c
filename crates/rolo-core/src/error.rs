//! Error types for `rolo-core`.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
  #[error("{0} is required")]
  MissingField(&'static str),

  #[error("invalid value for {field}: {value:?}")]
  InvalidField {
    field: &'static str,
    value: String,
  },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
