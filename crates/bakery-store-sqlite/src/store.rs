//! [`SqliteStore`] is the SQLite implementation of [`OrderStore`].

use std::{path::Path, sync::Arc};

use bakery_core::{
  audit::{NewOrderImage, NewOrderLog, OrderImage, OrderLog},
  calendar::CalendarEvent,
  clock::{Clock, SystemClock},
  customer::{Customer, CustomerPatch, NewCustomer},
  order::{NewOrder, Order, OrderPatch},
  store::OrderStore,
  view::{OrderDetails, calendar_events, stale_threshold},
};
use rusqlite::OptionalExtension as _;
use tracing::{debug, info};

use crate::{
  Error, Result,
  encode::{
    CUSTOMER_COLUMNS, EncodedOrder, IMAGE_COLUMNS, LOG_COLUMNS, ORDER_COLUMNS,
    RawCustomer, RawImage, RawLog, RawOrder, encode_date, encode_dt,
  },
  schema::SCHEMA,
};

// ─── Row writers ─────────────────────────────────────────────────────────────
//
// These run inside `Connection::call` closures, usually on an open
// transaction, and only ever return `rusqlite` errors.

fn insert_customer(
  conn: &rusqlite::Connection,
  c: &NewCustomer,
  now: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO customers (name, email, phone, address, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
    rusqlite::params![c.name, c.email, c.phone, c.address, now],
  )?;
  Ok(conn.last_insert_rowid())
}

fn write_customer(conn: &rusqlite::Connection, c: &Customer) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE customers
        SET name = ?2, email = ?3, phone = ?4, address = ?5, updated_at = ?6
      WHERE id = ?1",
    rusqlite::params![
      c.id,
      c.name,
      c.email,
      c.phone,
      c.address,
      encode_dt(c.updated_at),
    ],
  )?;
  Ok(())
}

fn insert_order(conn: &rusqlite::Connection, o: &EncodedOrder) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO orders (
       customer_id, customer_name, customer_phone, cake_type, cake_size,
       flavor, filling, frosting, decorations, special_instructions,
       quantity, price, order_date, delivery_date, delivery_time,
       delivery_address, status, card_number, card_exp_date, zip_code,
       payment_status, created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14,
               ?15, ?16, ?17, ?18, ?19, ?20, ?21, ?22, ?23)",
    rusqlite::params![
      o.customer_id,
      o.customer_name,
      o.customer_phone,
      o.cake_type,
      o.cake_size,
      o.flavor,
      o.filling,
      o.frosting,
      o.decorations,
      o.special_instructions,
      o.quantity,
      o.price,
      o.order_date,
      o.delivery_date,
      o.delivery_time,
      o.delivery_address,
      o.status,
      o.card_number,
      o.card_exp_date,
      o.zip_code,
      o.payment_status,
      o.created_at,
      o.updated_at,
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

fn write_order(conn: &rusqlite::Connection, id: i64, o: &EncodedOrder) -> rusqlite::Result<()> {
  conn.execute(
    "UPDATE orders SET
       customer_id = ?2, customer_name = ?3, customer_phone = ?4,
       cake_type = ?5, cake_size = ?6, flavor = ?7, filling = ?8,
       frosting = ?9, decorations = ?10, special_instructions = ?11,
       quantity = ?12, price = ?13, order_date = ?14, delivery_date = ?15,
       delivery_time = ?16, delivery_address = ?17, status = ?18,
       card_number = ?19, card_exp_date = ?20, zip_code = ?21,
       payment_status = ?22, updated_at = ?23
     WHERE id = ?1",
    rusqlite::params![
      id,
      o.customer_id,
      o.customer_name,
      o.customer_phone,
      o.cake_type,
      o.cake_size,
      o.flavor,
      o.filling,
      o.frosting,
      o.decorations,
      o.special_instructions,
      o.quantity,
      o.price,
      o.order_date,
      o.delivery_date,
      o.delivery_time,
      o.delivery_address,
      o.status,
      o.card_number,
      o.card_exp_date,
      o.zip_code,
      o.payment_status,
      o.updated_at,
    ],
  )?;
  Ok(())
}

fn insert_image(
  conn: &rusqlite::Connection,
  i: &NewOrderImage,
  now: &str,
) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO order_images (order_id, image_url, image_name, uploaded_at)
     VALUES (?1, ?2, ?3, ?4)",
    rusqlite::params![i.order_id, i.image_url, i.image_name, now],
  )?;
  Ok(conn.last_insert_rowid())
}

fn insert_log(conn: &rusqlite::Connection, l: &NewOrderLog, now: &str) -> rusqlite::Result<i64> {
  conn.execute(
    "INSERT INTO order_logs (order_id, action, description, user_name, created_at)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![l.order_id, l.action, l.description, l.user_name, now],
  )?;
  Ok(conn.last_insert_rowid())
}

fn select_order(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<Option<RawOrder>> {
  conn
    .query_row(
      &format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = ?1"),
      rusqlite::params![id],
      RawOrder::from_row,
    )
    .optional()
}

/// Raw rows backing one or more joined order views.
struct RawJoin {
  orders:    Vec<RawOrder>,
  customers: Vec<RawCustomer>,
  images:    Vec<RawImage>,
  logs:      Vec<RawLog>,
}

impl RawJoin {
  fn into_details(self) -> Result<Vec<OrderDetails>> {
    let customers = self
      .customers
      .into_iter()
      .map(RawCustomer::into_customer)
      .collect::<Result<Vec<_>>>()?;
    let images = self
      .images
      .into_iter()
      .map(RawImage::into_image)
      .collect::<Result<Vec<_>>>()?;
    let logs = self
      .logs
      .into_iter()
      .map(RawLog::into_log)
      .collect::<Result<Vec<_>>>()?;

    self
      .orders
      .into_iter()
      .map(|raw| {
        let order = raw.into_order()?;
        Ok(OrderDetails::assemble(order, &customers, &images, &logs))
      })
      .collect()
  }
}

/// Read active orders (optionally just one id) with everything they join to.
///
/// `scope` is a `WHERE` fragment over the `orders` table using `?1` for the
/// staleness threshold and `?2` for the id filter.
fn select_joined(
  conn: &mut rusqlite::Connection,
  threshold: &str,
  id: Option<i64>,
) -> rusqlite::Result<RawJoin> {
  const SCOPE: &str = "delivery_date >= ?1 AND (?2 IS NULL OR id = ?2)";

  let tx = conn.transaction()?;
  let params = rusqlite::params![threshold, id];

  let orders = tx
    .prepare(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE {SCOPE} ORDER BY id"))?
    .query_map(params, RawOrder::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let customers = tx
    .prepare(&format!(
      "SELECT {CUSTOMER_COLUMNS} FROM customers
        WHERE id IN (SELECT customer_id FROM orders WHERE {SCOPE})
        ORDER BY id"
    ))?
    .query_map(params, RawCustomer::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let images = tx
    .prepare(&format!(
      "SELECT {IMAGE_COLUMNS} FROM order_images
        WHERE order_id IN (SELECT id FROM orders WHERE {SCOPE})
        ORDER BY id"
    ))?
    .query_map(params, RawImage::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  let logs = tx
    .prepare(&format!(
      "SELECT {LOG_COLUMNS} FROM order_logs
        WHERE order_id IN (SELECT id FROM orders WHERE {SCOPE})
        ORDER BY id"
    ))?
    .query_map(params, RawLog::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  tx.commit()?;
  Ok(RawJoin { orders, customers, images, logs })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An order book backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn:  tokio_rusqlite::Connection,
  clock: Arc<dyn Clock>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    Self::open_with_clock(path, Arc::new(SystemClock)).await
  }

  /// Like [`SqliteStore::open`], reading time from `clock`.
  pub async fn open_with_clock(
    path: impl AsRef<Path>,
    clock: Arc<dyn Clock>,
  ) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn, clock };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    Self::open_in_memory_with_clock(Arc::new(SystemClock)).await
  }

  /// Like [`SqliteStore::open_in_memory`], reading time from `clock`.
  pub async fn open_in_memory_with_clock(clock: Arc<dyn Clock>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn, clock };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  fn threshold(&self) -> String { encode_date(stale_threshold(self.clock.today())) }
}

// ─── OrderStore impl ─────────────────────────────────────────────────────────

impl OrderStore for SqliteStore {
  type Error = Error;

  // ── Customers ─────────────────────────────────────────────────────────────

  async fn get_customers(&self) -> Result<Vec<Customer>> {
    let raws: Vec<RawCustomer> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawCustomer::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCustomer::into_customer).collect()
  }

  async fn get_customer(&self, id: i64) -> Result<Option<Customer>> {
    let raw: Option<RawCustomer> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
              rusqlite::params![id],
              RawCustomer::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCustomer::into_customer).transpose()
  }

  async fn create_customer(&self, input: NewCustomer) -> Result<Customer> {
    let now = self.clock.now();
    let now_str = encode_dt(now);

    let (id, input) = self
      .conn
      .call(move |conn| {
        let id = insert_customer(conn, &input, &now_str)?;
        Ok((id, input))
      })
      .await?;

    debug!(customer_id = id, "customer created");
    Ok(input.into_customer(id, now))
  }

  async fn update_customer(
    &self,
    id: i64,
    patch: CustomerPatch,
  ) -> Result<Option<Customer>> {
    let now = self.clock.now();

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let raw = tx
          .query_row(
            &format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = ?1"),
            rusqlite::params![id],
            RawCustomer::from_row,
          )
          .optional()?;
        let Some(raw) = raw else { return Ok(None) };

        let mut customer = raw.into_customer().map_err(Error::inside_call)?;
        patch.apply(&mut customer, now);
        write_customer(&tx, &customer)?;
        tx.commit()?;
        Ok(Some(customer))
      })
      .await?;

    if updated.is_some() {
      debug!(customer_id = id, "customer updated");
    }
    Ok(updated)
  }

  // ── Orders ────────────────────────────────────────────────────────────────

  async fn get_orders(&self) -> Result<Vec<OrderDetails>> {
    let threshold = self.threshold();
    let raw = self
      .conn
      .call(move |conn| select_joined(conn, &threshold, None).map_err(Into::into))
      .await?;
    raw.into_details()
  }

  async fn get_order(&self, id: i64) -> Result<Option<OrderDetails>> {
    let threshold = self.threshold();
    let raw = self
      .conn
      .call(move |conn| select_joined(conn, &threshold, Some(id)).map_err(Into::into))
      .await?;
    Ok(raw.into_details()?.into_iter().next())
  }

  async fn create_order(&self, input: NewOrder) -> Result<Order> {
    let now = self.clock.now();
    let now_str = encode_dt(now);
    // Ids are placeholders until the rows exist.
    let mut log = NewOrderLog::order_created(0, &input);
    let mut order = input.into_order(0, now);
    let encoded = EncodedOrder::from(&order);

    let (order_id, log_id, log) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let order_id = insert_order(&tx, &encoded)?;
        log.order_id = order_id;
        let log_id = insert_log(&tx, &log, &now_str)?;
        tx.commit()?;
        Ok((order_id, log_id, log))
      })
      .await?;

    order.id = order_id;
    debug!(order_id, cake_type = %order.cake_type, "order created");
    info!(order_id, log_id, action = %log.action, "audit entry appended");
    Ok(order)
  }

  async fn update_order(&self, id: i64, patch: OrderPatch) -> Result<Option<Order>> {
    let now = self.clock.now();
    let now_str = encode_dt(now);

    let updated = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let Some(raw) = select_order(&tx, id)? else { return Ok(None) };

        let mut order = raw.into_order().map_err(Error::inside_call)?;
        let change = patch.apply(&mut order, now);
        write_order(&tx, id, &EncodedOrder::from(&order))?;

        let log_id = match change {
          Some(change) => {
            Some(insert_log(&tx, &NewOrderLog::status_updated(id, change), &now_str)?)
          }
          None => None,
        };
        tx.commit()?;
        Ok(Some((order, log_id)))
      })
      .await?;

    let Some((order, log_id)) = updated else { return Ok(None) };
    debug!(order_id = id, "order updated");
    if let Some(log_id) = log_id {
      info!(order_id = id, log_id, status = %order.status, "audit entry appended");
    }
    Ok(Some(order))
  }

  // ── Attachments and audit trail ───────────────────────────────────────────

  async fn add_order_image(&self, input: NewOrderImage) -> Result<OrderImage> {
    let now = self.clock.now();
    let now_str = encode_dt(now);
    let log = NewOrderLog::image_added(&input);

    let (image_id, log_id, input) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let image_id = insert_image(&tx, &input, &now_str)?;
        let log_id = insert_log(&tx, &log, &now_str)?;
        tx.commit()?;
        Ok((image_id, log_id, input))
      })
      .await?;

    let image = input.into_image(image_id, now);
    debug!(order_id = image.order_id, image_id, "image attached");
    info!(order_id = image.order_id, log_id, "audit entry appended");
    Ok(image)
  }

  async fn add_order_log(&self, input: NewOrderLog) -> Result<OrderLog> {
    let now = self.clock.now();
    let now_str = encode_dt(now);

    let (log_id, input) = self
      .conn
      .call(move |conn| {
        let log_id = insert_log(conn, &input, &now_str)?;
        Ok((log_id, input))
      })
      .await?;

    let log = input.into_log(log_id, now);
    info!(order_id = log.order_id, log_id, action = %log.action, "audit entry appended");
    Ok(log)
  }

  // ── Calendar ──────────────────────────────────────────────────────────────

  async fn get_calendar_events(&self) -> Result<Vec<CalendarEvent>> {
    let threshold = self.threshold();
    let today = self.clock.today();

    let raws: Vec<RawOrder> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ORDER_COLUMNS} FROM orders WHERE delivery_date >= ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![threshold], RawOrder::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let orders = raws
      .into_iter()
      .map(RawOrder::into_order)
      .collect::<Result<Vec<_>>>()?;
    Ok(calendar_events(&orders, today))
  }
}
