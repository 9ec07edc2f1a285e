//! Error type for `bakery-store-memory`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A thread panicked while holding the store lock.
  #[error("store lock poisoned")]
  Poisoned,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
