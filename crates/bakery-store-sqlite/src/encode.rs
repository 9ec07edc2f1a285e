//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, dates as `YYYY-MM-DD` (so they
//! sort and compare lexically), times as `HH:MM:SS`, and status enums as their
//! snake_case names.

use bakery_core::{
  audit::{OrderImage, OrderLog},
  customer::Customer,
  order::{Order, OrderStatus, PaymentStatus},
};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::Decode(format!("timestamp {s:?}: {e}")))
}

// ─── NaiveDate / NaiveTime ───────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::Decode(format!("date {s:?}: {e}")))
}

pub fn encode_time(t: NaiveTime) -> String { t.format(TIME_FORMAT).to_string() }

pub fn decode_time(s: &str) -> Result<NaiveTime> {
  NaiveTime::parse_from_str(s, TIME_FORMAT)
    .map_err(|e| Error::Decode(format!("time {s:?}: {e}")))
}

// ─── Column lists ────────────────────────────────────────────────────────────

pub const CUSTOMER_COLUMNS: &str =
  "id, name, email, phone, address, created_at, updated_at";

pub const ORDER_COLUMNS: &str = "id, customer_id, customer_name, customer_phone,
  cake_type, cake_size, flavor, filling, frosting, decorations,
  special_instructions, quantity, price, order_date, delivery_date,
  delivery_time, delivery_address, status, card_number, card_exp_date,
  zip_code, payment_status, created_at, updated_at";

pub const IMAGE_COLUMNS: &str = "id, order_id, image_url, image_name, uploaded_at";

pub const LOG_COLUMNS: &str =
  "id, order_id, action, description, user_name, created_at";

// ─── Encoded order ───────────────────────────────────────────────────────────

/// Every `orders` column except `id`, ready to bind.
pub struct EncodedOrder {
  pub customer_id:          i64,
  pub customer_name:        Option<String>,
  pub customer_phone:       Option<String>,
  pub cake_type:            String,
  pub cake_size:            Option<String>,
  pub flavor:               Option<String>,
  pub filling:              Option<String>,
  pub frosting:             Option<String>,
  pub decorations:          Option<String>,
  pub special_instructions: Option<String>,
  pub quantity:             i64,
  pub price:                Option<f64>,
  pub order_date:           String,
  pub delivery_date:        String,
  pub delivery_time:        Option<String>,
  pub delivery_address:     Option<String>,
  pub status:               &'static str,
  pub card_number:          Option<String>,
  pub card_exp_date:        Option<String>,
  pub zip_code:             Option<String>,
  pub payment_status:       Option<&'static str>,
  pub created_at:           String,
  pub updated_at:           String,
}

impl From<&Order> for EncodedOrder {
  fn from(o: &Order) -> Self {
    Self {
      customer_id:          o.customer_id,
      customer_name:        o.customer_name.clone(),
      customer_phone:       o.customer_phone.clone(),
      cake_type:            o.cake_type.clone(),
      cake_size:            o.cake_size.clone(),
      flavor:               o.flavor.clone(),
      filling:              o.filling.clone(),
      frosting:             o.frosting.clone(),
      decorations:          o.decorations.clone(),
      special_instructions: o.special_instructions.clone(),
      quantity:             i64::from(o.quantity),
      price:                o.price,
      order_date:           encode_date(o.order_date),
      delivery_date:        encode_date(o.delivery_date),
      delivery_time:        o.delivery_time.map(encode_time),
      delivery_address:     o.delivery_address.clone(),
      status:               o.status.into(),
      card_number:          o.card_number.clone(),
      card_exp_date:        o.card_exp_date.clone(),
      zip_code:             o.zip_code.clone(),
      payment_status:       o.payment_status.map(Into::into),
      created_at:           encode_dt(o.created_at),
      updated_at:           encode_dt(o.updated_at),
    }
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `customers` row.
pub struct RawCustomer {
  pub id:         i64,
  pub name:       String,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

impl RawCustomer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:         row.get(0)?,
      name:       row.get(1)?,
      email:      row.get(2)?,
      phone:      row.get(3)?,
      address:    row.get(4)?,
      created_at: row.get(5)?,
      updated_at: row.get(6)?,
    })
  }

  pub fn into_customer(self) -> Result<Customer> {
    Ok(Customer {
      id:         self.id,
      name:       self.name,
      email:      self.email,
      phone:      self.phone,
      address:    self.address,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `orders` row.
pub struct RawOrder {
  pub id:                   i64,
  pub customer_id:          i64,
  pub customer_name:        Option<String>,
  pub customer_phone:       Option<String>,
  pub cake_type:            String,
  pub cake_size:            Option<String>,
  pub flavor:               Option<String>,
  pub filling:              Option<String>,
  pub frosting:             Option<String>,
  pub decorations:          Option<String>,
  pub special_instructions: Option<String>,
  pub quantity:             i64,
  pub price:                Option<f64>,
  pub order_date:           String,
  pub delivery_date:        String,
  pub delivery_time:        Option<String>,
  pub delivery_address:     Option<String>,
  pub status:               String,
  pub card_number:          Option<String>,
  pub card_exp_date:        Option<String>,
  pub zip_code:             Option<String>,
  pub payment_status:       Option<String>,
  pub created_at:           String,
  pub updated_at:           String,
}

impl RawOrder {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:                   row.get(0)?,
      customer_id:          row.get(1)?,
      customer_name:        row.get(2)?,
      customer_phone:       row.get(3)?,
      cake_type:            row.get(4)?,
      cake_size:            row.get(5)?,
      flavor:               row.get(6)?,
      filling:              row.get(7)?,
      frosting:             row.get(8)?,
      decorations:          row.get(9)?,
      special_instructions: row.get(10)?,
      quantity:             row.get(11)?,
      price:                row.get(12)?,
      order_date:           row.get(13)?,
      delivery_date:        row.get(14)?,
      delivery_time:        row.get(15)?,
      delivery_address:     row.get(16)?,
      status:               row.get(17)?,
      card_number:          row.get(18)?,
      card_exp_date:        row.get(19)?,
      zip_code:             row.get(20)?,
      payment_status:       row.get(21)?,
      created_at:           row.get(22)?,
      updated_at:           row.get(23)?,
    })
  }

  pub fn into_order(self) -> Result<Order> {
    let quantity = u32::try_from(self.quantity)
      .map_err(|_| Error::Decode(format!("quantity {}", self.quantity)))?;

    Ok(Order {
      id: self.id,
      customer_id: self.customer_id,
      customer_name: self.customer_name,
      customer_phone: self.customer_phone,
      cake_type: self.cake_type,
      cake_size: self.cake_size,
      flavor: self.flavor,
      filling: self.filling,
      frosting: self.frosting,
      decorations: self.decorations,
      special_instructions: self.special_instructions,
      quantity,
      price: self.price,
      order_date: decode_date(&self.order_date)?,
      delivery_date: decode_date(&self.delivery_date)?,
      delivery_time: self.delivery_time.as_deref().map(decode_time).transpose()?,
      delivery_address: self.delivery_address,
      status: OrderStatus::parse(&self.status)?,
      card_number: self.card_number,
      card_exp_date: self.card_exp_date,
      zip_code: self.zip_code,
      payment_status: self
        .payment_status
        .as_deref()
        .map(PaymentStatus::parse)
        .transpose()?,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

/// Raw values read directly from an `order_images` row.
pub struct RawImage {
  pub id:          i64,
  pub order_id:    i64,
  pub image_url:   String,
  pub image_name:  Option<String>,
  pub uploaded_at: String,
}

impl RawImage {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      order_id:    row.get(1)?,
      image_url:   row.get(2)?,
      image_name:  row.get(3)?,
      uploaded_at: row.get(4)?,
    })
  }

  pub fn into_image(self) -> Result<OrderImage> {
    Ok(OrderImage {
      id:          self.id,
      order_id:    self.order_id,
      image_url:   self.image_url,
      image_name:  self.image_name,
      uploaded_at: decode_dt(&self.uploaded_at)?,
    })
  }
}

/// Raw values read directly from an `order_logs` row.
pub struct RawLog {
  pub id:          i64,
  pub order_id:    i64,
  pub action:      String,
  pub description: Option<String>,
  pub user_name:   Option<String>,
  pub created_at:  String,
}

impl RawLog {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      id:          row.get(0)?,
      order_id:    row.get(1)?,
      action:      row.get(2)?,
      description: row.get(3)?,
      user_name:   row.get(4)?,
      created_at:  row.get(5)?,
    })
  }

  pub fn into_log(self) -> Result<OrderLog> {
    Ok(OrderLog {
      id:          self.id,
      order_id:    self.order_id,
      action:      self.action,
      description: self.description,
      user_name:   self.user_name,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn dates_sort_lexically() {
    let a = encode_date(NaiveDate::from_ymd_opt(2024, 9, 30).unwrap());
    let b = encode_date(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap());
    assert_eq!(a, "2024-09-30");
    assert!(a < b);
  }
}
