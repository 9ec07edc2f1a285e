//! [`MemoryStore`] is the in-memory implementation of [`OrderStore`].

use std::sync::{Arc, Mutex, MutexGuard};

use bakery_core::{
  audit::{NewOrderImage, NewOrderLog, OrderImage, OrderLog},
  calendar::CalendarEvent,
  clock::{Clock, SystemClock},
  customer::{Customer, CustomerPatch, NewCustomer},
  order::{NewOrder, Order, OrderPatch},
  store::OrderStore,
  view::{OrderDetails, calendar_events, is_order_old},
};
use tracing::{debug, info};

use crate::{Error, Result};

// ─── Tables ──────────────────────────────────────────────────────────────────

/// Next id to hand out, per entity type. Starts at 1 and only grows.
struct Sequences {
  customer: i64,
  order:    i64,
  image:    i64,
  log:      i64,
}

impl Default for Sequences {
  fn default() -> Self { Self { customer: 1, order: 1, image: 1, log: 1 } }
}

fn take(seq: &mut i64) -> i64 {
  let id = *seq;
  *seq += 1;
  id
}

#[derive(Default)]
struct Tables {
  customers: Vec<Customer>,
  orders:    Vec<Order>,
  images:    Vec<OrderImage>,
  logs:      Vec<OrderLog>,
  next:      Sequences,
}

impl Tables {
  fn push_log(&mut self, input: NewOrderLog, now: chrono::DateTime<chrono::Utc>) -> OrderLog {
    let log = input.into_log(take(&mut self.next.log), now);
    info!(
      order_id = log.order_id,
      log_id = log.id,
      action = %log.action,
      "audit entry appended"
    );
    self.logs.push(log.clone());
    log
  }

  fn details(&self, order: &Order) -> OrderDetails {
    OrderDetails::assemble(order.clone(), &self.customers, &self.images, &self.logs)
  }
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An order book held entirely in process memory.
///
/// Cloning is cheap; clones share the same tables.
#[derive(Clone)]
pub struct MemoryStore {
  tables: Arc<Mutex<Tables>>,
  clock:  Arc<dyn Clock>,
}

impl Default for MemoryStore {
  fn default() -> Self { Self::new() }
}

impl MemoryStore {
  /// An empty store on the system clock.
  pub fn new() -> Self { Self::with_clock(Arc::new(SystemClock)) }

  /// An empty store reading time from `clock`.
  pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
    Self { tables: Arc::new(Mutex::new(Tables::default())), clock }
  }

  fn tables(&self) -> Result<MutexGuard<'_, Tables>> {
    self.tables.lock().map_err(|_| Error::Poisoned)
  }
}

// ─── OrderStore impl ─────────────────────────────────────────────────────────

impl OrderStore for MemoryStore {
  type Error = Error;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn get_customers(&self) -> Result<Vec<Customer>> {
    Ok(self.tables()?.customers.clone())
  }

  async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
    Ok(self.tables()?.customers.iter().find(|c| c.id == id).cloned())
  }

  async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
    let now = self.clock.now();
    let mut t = self.tables()?;
    let customer = input.into_customer(take(&mut t.next.customer), now);
    debug!(customer_id = customer.id, "customer created");
    t.customers.push(customer.clone());
    Ok(customer)
  }

  async fn update_customer(
    &self,
    id: i64,
    patch: CustomerPatch,
  ) -> Result<Option<Customer>> {
    let now = self.clock.now();
    let mut t = self.tables()?;
    let Some(customer) = t.customers.iter_mut().find(|c| c.id == id) else {
      return Ok(None);
    };
    patch.apply(customer, now);
    debug!(customer_id = id, "customer updated");
    Ok(Some(customer.clone()))
  }

  // ── Orders ────────────────────────────────────────────────────────────────

  async fn get_orders(&self) -> Result<Vec<OrderDetails>> {
    let today = self.clock.today();
    let t = self.tables()?;
    Ok(
      t.orders
        .iter()
        .filter(|o| !is_order_old(o.delivery_date, today))
        .map(|o| t.details(o))
        .collect(),
    )
  }

  async fn get_order(&self, id: i64) -> Result<Option<OrderDetails>> {
    let today = self.clock.today();
    let t = self.tables()?;
    Ok(
      t.orders
        .iter()
        .find(|o| o.id == id)
        .filter(|o| !is_order_old(o.delivery_date, today))
        .map(|o| t.details(o)),
    )
  }

  async fn create_order(&self, input: NewOrder) -> Result<Order> {
    let now = self.clock.now();
    let mut t = self.tables()?;
    let id = take(&mut t.next.order);
    let log = NewOrderLog::order_created(id, &input);
    let order = input.into_order(id, now);
    debug!(order_id = id, cake_type = %order.cake_type, "order created");
    t.orders.push(order.clone());
    t.push_log(log, now);
    Ok(order)
  }

  async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>> {
    let now = self.clock.now();
    let mut t = self.tables()?;
    let Some(order) = t.orders.iter_mut().find(|o| o.id == id) else {
      return Ok(None);
    };
    let change = patch.apply(order, now);
    let order = order.clone();
    debug!(order_id = id, "order updated");
    if let Some(change) = change {
      t.push_log(NewOrderLog::status_updated(id, change), now);
    }
    Ok(Some(order))
  }

  // ── Attachments and audit trail ───────────────────────────────────────────

  async fn add_order_image(&self, input: NewOrderImage) -> Result<OrderImage> {
    let now = self.clock.now();
    let mut t = self.tables()?;
    let log = NewOrderLog::image_added(&input);
    let image = input.into_image(take(&mut t.next.image), now);
    debug!(order_id = image.order_id, image_id = image.id, "image attached");
    t.images.push(image.clone());
    t.push_log(log, now);
    Ok(image)
  }

  async fn add_order_log(&self, input: NewOrderLog) -> Result<OrderLog> {
    let now = self.clock.now();
    Ok(self.tables()?.push_log(input, now))
  }

  // ── Calendar ──────────────────────────────────────────────────────────────

  async fn get_calendar_events(&self) -> Result<Vec<CalendarEvent>> {
    let today = self.clock.today();
    Ok(calendar_events(&self.tables()?.orders, today))
  }
}
