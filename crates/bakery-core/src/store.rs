//! The `OrderStore` trait.
//!
//! The trait is implemented by storage backends (`bakery-store-memory`,
//! `bakery-store-sqlite`). The API layer depends on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  audit::{NewOrderImage, NewOrderLog, OrderImage, OrderLog},
  calendar::CalendarEvent,
  customer::{Customer, CustomerPatch, NewCustomer},
  order::{NewOrder, Order, OrderPatch},
  view::OrderDetails,
};

/// Abstraction over an order-book backend.
///
/// Identifiers are positive integers assigned in strictly increasing order per
/// entity type and never reused. Every timestamp is taken from the clock the
/// backend was built with.
///
/// Unknown ids are not errors: lookups and updates report them as `Ok(None)`.
/// `Self::Error` is reserved for backend failures.
///
/// Each method is one atomic unit: a write that also appends an audit entry
/// is never observable half-applied, and reads that join several collections
/// see a single consistent snapshot.
pub trait OrderStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Customers ─────────────────────────────────────────────────────────

  /// All customers, in creation order.
  fn get_customers(
    &self,
  ) -> impl Future<Output = Result<Vec<Customer>, Self::Error>> + Send + '_;

  /// A single customer. Returns `None` if not found.
  fn get_customer(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  /// Persist a new customer with both timestamps set to now.
  fn create_customer(
    &self,
    input: NewCustomer,
  ) -> impl Future<Output = Result<Customer, Self::Error>> + Send + '_;

  /// Merge `patch` onto an existing customer and refresh `updated_at`.
  /// Returns `None` if the customer does not exist.
  fn update_customer(
    &self,
    id: i64,
    patch: CustomerPatch,
  ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send + '_;

  // ── Orders ────────────────────────────────────────────────────────────

  /// Every active order, joined, in insertion order.
  fn get_orders(
    &self,
  ) -> impl Future<Output = Result<Vec<OrderDetails>, Self::Error>> + Send + '_;

  /// A single active order, joined. Returns `None` both when the order never
  /// existed and when it exists but is no longer active.
  fn get_order(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<OrderDetails>, Self::Error>> + Send + '_;

  /// Persist a new order and append its "Order Created" entry.
  fn create_order(
    &self,
    input: NewOrder,
  ) -> impl Future<Output = Result<Order, Self::Error>> + Send + '_;

  /// Merge `patch` onto an existing order and refresh `updated_at`. If the
  /// merged status differs from the prior one, exactly one "Status Updated"
  /// entry is appended. Returns `None` if the order does not exist.
  ///
  /// Activity is not checked: an order hidden from reads can still be updated.
  fn update_order(
    &self,
    id: i64,
    patch: OrderPatch,
  ) -> impl Future<Output = Result<Option<Order>, Self::Error>> + Send + '_;

  // ── Attachments and audit trail ───────────────────────────────────────

  /// Persist an image and append its "Image Added" entry.
  fn add_order_image(
    &self,
    input: NewOrderImage,
  ) -> impl Future<Output = Result<OrderImage, Self::Error>> + Send + '_;

  /// Append an explicit audit entry outside the standard triggers.
  fn add_order_log(
    &self,
    input: NewOrderLog,
  ) -> impl Future<Output = Result<OrderLog, Self::Error>> + Send + '_;

  // ── Calendar ──────────────────────────────────────────────────────────

  /// Active orders projected onto the calendar, ordered by delivery date.
  fn get_calendar_events(
    &self,
  ) -> impl Future<Output = Result<Vec<CalendarEvent>, Self::Error>> + Send + '_;
}
