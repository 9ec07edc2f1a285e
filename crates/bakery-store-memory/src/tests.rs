//! Behaviour tests for `MemoryStore`.

use std::sync::Arc;

use bakery_core::{
  clock::FixedClock,
  conformance,
  customer::NewCustomer,
  store::OrderStore,
};
use chrono::{TimeZone, Utc};

use crate::MemoryStore;

fn store() -> (MemoryStore, Arc<FixedClock>) {
  let clock = Arc::new(FixedClock::new(
    Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap(),
  ));
  (MemoryStore::with_clock(clock.clone()), clock)
}

// ─── Shared behaviour ────────────────────────────────────────────────────────

#[tokio::test]
async fn ids_are_monotonic() {
  let (s, c) = store();
  conformance::ids_are_monotonic(&s, &c).await;
}

#[tokio::test]
async fn customer_update_merges() {
  let (s, c) = store();
  conformance::customer_update_merges(&s, &c).await;
}

#[tokio::test]
async fn unknown_ids_are_absent() {
  let (s, c) = store();
  conformance::unknown_ids_are_absent(&s, &c).await;
}

#[tokio::test]
async fn order_update_merges() {
  let (s, c) = store();
  conformance::order_update_merges(&s, &c).await;
}

#[tokio::test]
async fn status_change_is_logged_once() {
  let (s, c) = store();
  conformance::status_change_is_logged_once(&s, &c).await;
}

#[tokio::test]
async fn stale_orders_are_hidden() {
  let (s, c) = store();
  conformance::stale_orders_are_hidden(&s, &c).await;
}

#[tokio::test]
async fn calendar_is_ordered_by_date() {
  let (s, c) = store();
  conformance::calendar_is_ordered_by_date(&s, &c).await;
}

#[tokio::test]
async fn order_lifecycle_scenario() {
  let (s, c) = store();
  conformance::order_lifecycle_scenario(&s, &c).await;
}

#[tokio::test]
async fn image_attach_is_logged() {
  let (s, c) = store();
  conformance::image_attach_is_logged(&s, &c).await;
}

#[tokio::test]
async fn joins_are_scoped_to_the_order() {
  let (s, c) = store();
  conformance::joins_are_scoped_to_the_order(&s, &c).await;
}

// ─── Backend specifics ───────────────────────────────────────────────────────

#[tokio::test]
async fn clones_share_tables() {
  let (s, _) = store();
  let other = s.clone();

  other.create_customer(NewCustomer::new("Amy")).await.unwrap();
  assert_eq!(s.get_customers().await.unwrap().len(), 1);
}

#[tokio::test]
async fn concurrent_writers_never_share_ids() {
  let (s, _) = store();

  let handles: Vec<_> = (0..16)
    .map(|n| {
      let s = s.clone();
      tokio::spawn(async move {
        s.create_customer(NewCustomer::new(format!("Customer {n}")))
          .await
          .unwrap()
          .id
      })
    })
    .collect();

  let mut ids = Vec::new();
  for h in handles {
    ids.push(h.await.unwrap());
  }
  ids.sort();
  assert_eq!(ids, (1..=16).collect::<Vec<i64>>());
}
