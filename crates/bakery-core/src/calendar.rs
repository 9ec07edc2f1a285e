//! The calendar projection of an order.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::order::{Order, OrderStatus};

pub const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// A read-only view of one order on the delivery calendar. Never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
  /// Same as the order id.
  pub id:            i64,
  pub title:         String,
  pub date:          NaiveDate,
  pub time:          Option<NaiveTime>,
  pub status:        OrderStatus,
  pub customer_name: String,
}

impl CalendarEvent {
  pub fn from_order(order: &Order) -> Self {
    let customer_name = order
      .customer_name
      .as_deref()
      .filter(|n| !n.trim().is_empty())
      .unwrap_or(UNKNOWN_CUSTOMER)
      .to_owned();

    Self {
      id: order.id,
      title: format!("{} - {customer_name}", order.cake_type),
      date: order.delivery_date,
      time: order.delivery_time,
      status: order.status,
      customer_name,
    }
  }
}
