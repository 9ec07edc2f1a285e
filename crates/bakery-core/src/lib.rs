//! Core types and trait definitions for the bakery order book.
//!
//! Customers, orders, their audit trail, and the rule deciding which orders
//! are still active. Storage backends implement [`store::OrderStore`]; the
//! API layer consumes it. No HTTP or database code lives here.

// Backends implement the `impl Future + Send` signatures with `async fn`.
#![allow(async_fn_in_trait)]

pub mod audit;
pub mod calendar;
pub mod clock;
#[cfg(feature = "conformance")]
pub mod conformance;
pub mod customer;
pub mod error;
pub mod form;
pub mod order;
pub mod store;
pub mod view;

pub use error::{Error, FormError, Result};
