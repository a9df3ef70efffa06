//! Error types for `biolab-core`.

use thiserror::Error;

use crate::inquiry::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown inquiry status: {0:?}")]
  UnknownStatus(String),

  #[error(transparent)]
  Validation(#[from] ValidationError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
