//! The active-order visibility rule and the joined read model.
//!
//! An order is visible only while its delivery date is no more than
//! [`ACTIVE_WINDOW_DAYS`] in the past. Nothing is ever deleted: the rule is a
//! pure function of the delivery date and "today", evaluated on every read, so
//! the visible set shrinks on its own as time moves forward.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{
  audit::{OrderImage, OrderLog},
  calendar::CalendarEvent,
  customer::Customer,
  order::Order,
};

pub const ACTIVE_WINDOW_DAYS: u64 = 14;

/// The earliest delivery date that is still active on `today`.
pub fn stale_threshold(today: NaiveDate) -> NaiveDate {
  today
    .checked_sub_days(Days::new(ACTIVE_WINDOW_DAYS))
    .unwrap_or(NaiveDate::MIN)
}

/// `true` when the order should be hidden from every read view.
pub fn is_order_old(delivery_date: NaiveDate, today: NaiveDate) -> bool {
  delivery_date < stale_threshold(today)
}

/// Project the active subset of `orders` onto the calendar, ordered by date.
///
/// The sort is stable and keyed on the date only, so events on the same day
/// keep their original relative order regardless of delivery time.
pub fn calendar_events<'a>(
  orders: impl IntoIterator<Item = &'a Order>,
  today: NaiveDate,
) -> Vec<CalendarEvent> {
  let mut events: Vec<CalendarEvent> = orders
    .into_iter()
    .filter(|o| !is_order_old(o.delivery_date, today))
    .map(CalendarEvent::from_order)
    .collect();
  events.sort_by_key(|e| e.date);
  events
}

/// An order joined with its customer, images and audit trail. Never stored,
/// always derived.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDetails {
  #[serde(flatten)]
  pub order:    Order,
  /// The live customer record; `None` if `customer_id` resolves to nothing.
  pub customer: Option<Customer>,
  pub images:   Vec<OrderImage>,
  pub logs:     Vec<OrderLog>,
}

impl OrderDetails {
  /// Join `order` against full collections, keeping only rows it owns.
  pub fn assemble<'a>(
    order: Order,
    customers: impl IntoIterator<Item = &'a Customer>,
    images: impl IntoIterator<Item = &'a OrderImage>,
    logs: impl IntoIterator<Item = &'a OrderLog>,
  ) -> Self {
    let customer = customers
      .into_iter()
      .find(|c| c.id == order.customer_id)
      .cloned();
    let images = images
      .into_iter()
      .filter(|i| i.order_id == order.id)
      .cloned()
      .collect();
    let logs = logs
      .into_iter()
      .filter(|l| l.order_id == order.id)
      .cloned()
      .collect();
    Self { order, customer, images, logs }
  }
}

#[cfg(test)]
mod tests {
  use chrono::{Duration, TimeZone, Utc};

  use super::*;
  use crate::order::{NewOrder, OrderStatus};

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 7, 20).unwrap() }

  fn order(id: i64, delivery: NaiveDate, name: Option<&str>) -> Order {
    let mut input = NewOrder::new(1, "Birthday Cake", today(), delivery);
    input.customer_name = name.map(str::to_owned);
    input.into_order(id, Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap())
  }

  #[test]
  fn staleness_boundary() {
    let t = today();
    assert!(is_order_old(t - Duration::days(15), t));
    assert!(!is_order_old(t - Duration::days(14), t));
    assert!(!is_order_old(t - Duration::days(13), t));
    assert!(!is_order_old(t + Duration::days(30), t));
  }

  #[test]
  fn calendar_filters_and_sorts_by_date() {
    let t = today();
    let orders = vec![
      order(1, t + Duration::days(14), Some("Sarah Johnson")),
      order(2, t + Duration::days(7), None),
      order(3, t - Duration::days(20), Some("Mike Chen")),
      order(4, t + Duration::days(5), Some("")),
    ];

    let events = calendar_events(&orders, t);
    let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![4, 2, 1]);

    assert_eq!(events[0].customer_name, "Unknown Customer");
    assert_eq!(events[1].title, "Birthday Cake - Unknown Customer");
    assert_eq!(events[2].title, "Birthday Cake - Sarah Johnson");
    assert_eq!(events[2].status, OrderStatus::InProgress);
  }

  #[test]
  fn same_day_events_keep_insertion_order() {
    let t = today();
    let day = t + Duration::days(3);
    let mut late = order(1, day, Some("A"));
    late.delivery_time = chrono::NaiveTime::from_hms_opt(17, 0, 0);
    let mut early = order(2, day, Some("B"));
    early.delivery_time = chrono::NaiveTime::from_hms_opt(9, 0, 0);

    let ids: Vec<i64> = calendar_events(&[late, early], t).iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
  }

  #[test]
  fn details_serialise_flat() {
    let details = OrderDetails::assemble(
      order(5, today(), Some("Amy")),
      &[] as &[Customer],
      &[] as &[OrderImage],
      &[] as &[OrderLog],
    );
    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["id"], 5);
    assert_eq!(json["cake_type"], "Birthday Cake");
    assert!(json["customer"].is_null());
    assert_eq!(json["logs"], serde_json::json!([]));
  }
}
