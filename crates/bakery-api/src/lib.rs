//! JSON REST API for the bakery order book.
//!
//! Exposes an axum [`Router`] backed by any [`bakery_core::store::OrderStore`].
//! Writes accept urlencoded form bodies, which are coerced by
//! [`bakery_core::form`]; reads return JSON. Auth, TLS, and transport concerns
//! are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", bakery_api::api_router(ApiState::new(store, clock)))
//! ```

pub mod calendar;
pub mod customers;
pub mod error;
pub mod orders;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post, put},
};
use bakery_core::{clock::Clock, store::OrderStore};

pub use error::ApiError;

/// Shared state threaded through all handlers.
pub struct ApiState<S> {
  pub store: Arc<S>,
  /// Supplies "today" for form defaults such as the order date.
  pub clock: Arc<dyn Clock>,
}

impl<S> ApiState<S> {
  pub fn new(store: Arc<S>, clock: Arc<dyn Clock>) -> Self { Self { store, clock } }
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self { store: self.store.clone(), clock: self.clock.clone() }
  }
}

/// Build a fully-materialised API router over `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: OrderStore + 'static,
{
  Router::new()
    // Customers
    .route("/customers", get(customers::list::<S>).post(customers::create::<S>))
    .route(
      "/customers/{id}",
      get(customers::get_one::<S>).patch(customers::update::<S>),
    )
    // Orders
    .route("/orders", get(orders::list::<S>).post(orders::create::<S>))
    .route("/orders/{id}", get(orders::get_one::<S>).patch(orders::update::<S>))
    .route("/orders/{id}/status", put(orders::update_status::<S>))
    .route("/orders/{id}/images", post(orders::add_image::<S>))
    .route("/orders/{id}/logs", post(orders::add_log::<S>))
    // Calendar
    .route("/calendar", get(calendar::events::<S>))
    .with_state(state)
}

#[cfg(test)]
mod tests;
