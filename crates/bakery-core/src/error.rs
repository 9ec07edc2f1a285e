//! Error types for `bakery-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown order status: {0:?}")]
  UnknownStatus(String),

  #[error("unknown payment status: {0:?}")]
  UnknownPaymentStatus(String),
}

/// Raised while coercing loosely-typed form fields into typed records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
  #[error("missing required field `{0}`")]
  Missing(&'static str),

  #[error("field `{field}` is not a valid number: {value:?}")]
  InvalidNumber { field: &'static str, value: String },

  #[error("field `{field}` is not a valid date or time: {value:?}")]
  InvalidDate { field: &'static str, value: String },

  #[error("field `{field}` has an unrecognised value: {value:?}")]
  InvalidValue { field: &'static str, value: String },

  #[error("field `{field}` is out of range: {value:?}")]
  OutOfRange { field: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
