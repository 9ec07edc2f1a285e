//! Error type for `bakery-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] bakery_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  /// A stored column could not be turned back into a domain value.
  #[error("decode error: {0}")]
  Decode(String),
}

impl Error {
  /// Wrap a decode failure raised inside a connection closure.
  pub(crate) fn inside_call(self) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Other(Box::new(self))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
