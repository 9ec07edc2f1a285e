//! Orders: one cake order for one customer, keyed by delivery date.
//!
//! An order keeps a snapshot of the customer's name and phone taken when the
//! order was written, alongside the live `customer_id` reference. Both are
//! retained: the snapshot is what the calendar shows, the reference is what
//! the joined read model resolves.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, IntoStaticStr};

use crate::{Error, Result};

// ─── Status enums ────────────────────────────────────────────────────────────

/// Where an order is in the bakery's workflow.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OrderStatus {
  #[default]
  InProgress,
  Completed,
}

impl OrderStatus {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownStatus(s.to_owned()))
  }
}

/// State of the captured payment. Card data is never checked against a
/// payment network; this is bookkeeping only.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  Display,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
  Pending,
  Paid,
  Failed,
  Refunded,
}

impl PaymentStatus {
  pub fn parse(s: &str) -> Result<Self> {
    Self::from_str(s).map_err(|_| Error::UnknownPaymentStatus(s.to_owned()))
  }
}

// ─── Order ───────────────────────────────────────────────────────────────────

/// A stored order record, without any joined data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
  pub id:                   i64,
  pub customer_id:          i64,
  /// Display snapshot; may diverge from the live customer record.
  pub customer_name:        Option<String>,
  pub customer_phone:       Option<String>,
  pub cake_type:            String,
  pub cake_size:            Option<String>,
  pub flavor:               Option<String>,
  pub filling:              Option<String>,
  pub frosting:             Option<String>,
  pub decorations:          Option<String>,
  pub special_instructions: Option<String>,
  pub quantity:             u32,
  pub price:                Option<f64>,
  pub order_date:           NaiveDate,
  /// The date the staleness rule is evaluated against.
  pub delivery_date:        NaiveDate,
  pub delivery_time:        Option<NaiveTime>,
  pub delivery_address:     Option<String>,
  pub status:               OrderStatus,
  /// Stored exactly as captured.
  pub card_number:          Option<String>,
  pub card_exp_date:        Option<String>,
  pub zip_code:             Option<String>,
  pub payment_status:       Option<PaymentStatus>,
  pub created_at:           DateTime<Utc>,
  pub updated_at:           DateTime<Utc>,
}

// ─── NewOrder ────────────────────────────────────────────────────────────────

/// Input to [`crate::store::OrderStore::create_order`].
/// `id`, `created_at` and `updated_at` are always set by the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
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
  pub quantity:             u32,
  pub price:                Option<f64>,
  pub order_date:           NaiveDate,
  pub delivery_date:        NaiveDate,
  pub delivery_time:        Option<NaiveTime>,
  pub delivery_address:     Option<String>,
  pub status:               OrderStatus,
  pub card_number:          Option<String>,
  pub card_exp_date:        Option<String>,
  pub zip_code:             Option<String>,
  pub payment_status:       Option<PaymentStatus>,
}

impl NewOrder {
  /// Convenience constructor with every optional field absent, quantity 1
  /// and status `in_progress`.
  pub fn new(
    customer_id: i64,
    cake_type: impl Into<String>,
    order_date: NaiveDate,
    delivery_date: NaiveDate,
  ) -> Self {
    Self {
      customer_id,
      customer_name: None,
      customer_phone: None,
      cake_type: cake_type.into(),
      cake_size: None,
      flavor: None,
      filling: None,
      frosting: None,
      decorations: None,
      special_instructions: None,
      quantity: 1,
      price: None,
      order_date,
      delivery_date,
      delivery_time: None,
      delivery_address: None,
      status: OrderStatus::default(),
      card_number: None,
      card_exp_date: None,
      zip_code: None,
      payment_status: None,
    }
  }

  /// Build the stored record once the store has picked an id and a time.
  pub fn into_order(self, id: i64, now: DateTime<Utc>) -> Order {
    Order {
      id,
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
      quantity: self.quantity,
      price: self.price,
      order_date: self.order_date,
      delivery_date: self.delivery_date,
      delivery_time: self.delivery_time,
      delivery_address: self.delivery_address,
      status: self.status,
      card_number: self.card_number,
      card_exp_date: self.card_exp_date,
      zip_code: self.zip_code,
      payment_status: self.payment_status,
      created_at: now,
      updated_at: now,
    }
  }
}

// ─── OrderPatch ──────────────────────────────────────────────────────────────

/// A status transition observed while applying an [`OrderPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
  pub from: OrderStatus,
  pub to:   OrderStatus,
}

/// A partial update: only `Some` fields overwrite the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderPatch {
  pub customer_id:          Option<i64>,
  pub customer_name:        Option<String>,
  pub customer_phone:       Option<String>,
  pub cake_type:            Option<String>,
  pub cake_size:            Option<String>,
  pub flavor:               Option<String>,
  pub filling:              Option<String>,
  pub frosting:             Option<String>,
  pub decorations:          Option<String>,
  pub special_instructions: Option<String>,
  pub quantity:             Option<u32>,
  pub price:                Option<f64>,
  pub order_date:           Option<NaiveDate>,
  pub delivery_date:        Option<NaiveDate>,
  pub delivery_time:        Option<NaiveTime>,
  pub delivery_address:     Option<String>,
  pub status:               Option<OrderStatus>,
  pub card_number:          Option<String>,
  pub card_exp_date:        Option<String>,
  pub zip_code:             Option<String>,
  pub payment_status:       Option<PaymentStatus>,
}

impl OrderPatch {
  /// A patch that only sets the status.
  pub fn status(status: OrderStatus) -> Self {
    Self { status: Some(status), ..Self::default() }
  }

  /// The transition this patch would cause on `current`, if any.
  pub fn status_change(&self, current: OrderStatus) -> Option<StatusChange> {
    self
      .status
      .filter(|to| *to != current)
      .map(|to| StatusChange { from: current, to })
  }

  /// Shallow-merge onto `order`, refresh `updated_at`, and report the status
  /// transition if the merged status differs from the prior one.
  pub fn apply(self, order: &mut Order, now: DateTime<Utc>) -> Option<StatusChange> {
    let change = self.status_change(order.status);

    fn set<T>(slot: &mut T, value: Option<T>) {
      if let Some(v) = value {
        *slot = v;
      }
    }
    fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
      if value.is_some() {
        *slot = value;
      }
    }

    set(&mut order.customer_id, self.customer_id);
    set_opt(&mut order.customer_name, self.customer_name);
    set_opt(&mut order.customer_phone, self.customer_phone);
    set(&mut order.cake_type, self.cake_type);
    set_opt(&mut order.cake_size, self.cake_size);
    set_opt(&mut order.flavor, self.flavor);
    set_opt(&mut order.filling, self.filling);
    set_opt(&mut order.frosting, self.frosting);
    set_opt(&mut order.decorations, self.decorations);
    set_opt(&mut order.special_instructions, self.special_instructions);
    set(&mut order.quantity, self.quantity);
    set_opt(&mut order.price, self.price);
    set(&mut order.order_date, self.order_date);
    set(&mut order.delivery_date, self.delivery_date);
    set_opt(&mut order.delivery_time, self.delivery_time);
    set_opt(&mut order.delivery_address, self.delivery_address);
    set(&mut order.status, self.status);
    set_opt(&mut order.card_number, self.card_number);
    set_opt(&mut order.card_exp_date, self.card_exp_date);
    set_opt(&mut order.zip_code, self.zip_code);
    set_opt(&mut order.payment_status, self.payment_status);
    order.updated_at = now;

    change
  }
}
