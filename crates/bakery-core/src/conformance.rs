//! Behaviour every [`OrderStore`] backend must exhibit.
//!
//! Each check takes a fresh, empty store together with the [`FixedClock`] the
//! store was built with, and panics on the first violated expectation. Backend
//! crates call these from their own `#[tokio::test]` functions.

use chrono::{Duration, NaiveDate};

use crate::{
  audit::{NewOrderImage, NewOrderLog},
  clock::{Clock, FixedClock},
  customer::{CustomerPatch, NewCustomer},
  order::{NewOrder, OrderPatch, OrderStatus, PaymentStatus},
  store::OrderStore,
};

fn days_from(today: NaiveDate, days: i64) -> NaiveDate { today + Duration::days(days) }

async fn customer<S: OrderStore>(store: &S, name: &str) -> i64 {
  store
    .create_customer(NewCustomer::new(name))
    .await
    .expect("create customer")
    .id
}

fn order_for(customer_id: i64, cake: &str, today: NaiveDate, delivery: NaiveDate) -> NewOrder {
  NewOrder::new(customer_id, cake, today, delivery)
}

/// Ids start at 1, grow strictly per entity type, and are never reused.
pub async fn ids_are_monotonic<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let mut last_customer = 0;
  let mut last_order = 0;
  let mut last_image = 0;
  let mut last_log = 0;

  for n in 0..3 {
    let c = customer(store, &format!("Customer {n}")).await;
    assert!(c > last_customer, "customer ids must increase");
    last_customer = c;

    let o = store
      .create_order(order_for(c, "Cupcakes", today, days_from(today, 2)))
      .await
      .expect("create order");
    assert!(o.id > last_order, "order ids must increase");
    last_order = o.id;

    let img = store
      .add_order_image(NewOrderImage {
        order_id:   o.id,
        image_url:  format!("https://img.example/{n}.jpg"),
        image_name: None,
      })
      .await
      .expect("add image");
    assert!(img.id > last_image, "image ids must increase");
    last_image = img.id;

    let log = store
      .add_order_log(NewOrderLog {
        order_id:    o.id,
        action:      "Note".into(),
        description: None,
        user_name:   None,
      })
      .await
      .expect("add log");
    assert!(log.id > last_log, "log ids must increase");
    last_log = log.id;
  }

  assert_eq!(last_customer, 3);
  assert_eq!(last_order, 3);
  assert_eq!(last_image, 3);
  // Per order: "Order Created", "Image Added", then the manual note.
  assert_eq!(last_log, 9);
}

/// Customer updates overwrite only present fields and refresh `updated_at`.
pub async fn customer_update_merges<S: OrderStore>(store: &S, clock: &FixedClock) {
  let created = store
    .create_customer(NewCustomer {
      name:    "Sarah Johnson".into(),
      email:   Some("sarah@email.com".into()),
      phone:   None,
      address: None,
    })
    .await
    .expect("create customer");
  assert_eq!(created.created_at, created.updated_at);
  assert!(created.phone.is_none());

  clock.advance(Duration::minutes(5));
  let updated = store
    .update_customer(created.id, CustomerPatch {
      phone: Some("(555) 123-4567".into()),
      ..Default::default()
    })
    .await
    .expect("update customer")
    .expect("customer exists");

  assert_eq!(updated.name, "Sarah Johnson");
  assert_eq!(updated.email.as_deref(), Some("sarah@email.com"));
  assert_eq!(updated.phone.as_deref(), Some("(555) 123-4567"));
  assert_eq!(updated.created_at, created.created_at);
  assert_eq!(updated.updated_at, created.updated_at + Duration::minutes(5));

  let fetched = store.get_customer(created.id).await.expect("get customer");
  assert_eq!(fetched, Some(updated));
  assert_eq!(store.get_customers().await.expect("list").len(), 1);
}

/// Unknown ids read and update as absent, never as errors.
pub async fn unknown_ids_are_absent<S: OrderStore>(store: &S, _clock: &FixedClock) {
  assert!(store.get_customer(42).await.expect("get customer").is_none());
  assert!(store.get_order(42).await.expect("get order").is_none());
  assert!(
    store
      .update_customer(42, CustomerPatch::default())
      .await
      .expect("update customer")
      .is_none()
  );
  assert!(
    store
      .update_order(42, OrderPatch::status(OrderStatus::Completed))
      .await
      .expect("update order")
      .is_none()
  );
}

/// Order updates overwrite exactly the patched fields and advance `updated_at`.
pub async fn order_update_merges<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Mike Chen").await;

  let mut input = order_for(c, "Birthday Cake", today, days_from(today, 7));
  input.customer_name = Some("Mike Chen".into());
  input.flavor = Some("Chocolate".into());
  input.price = Some(85.0);
  input.delivery_time = chrono::NaiveTime::from_hms_opt(12, 0, 0);
  input.card_number = Some("**** **** **** 5678".into());
  input.payment_status = Some(PaymentStatus::Pending);
  let original = store.create_order(input).await.expect("create order");

  clock.advance(Duration::hours(1));
  let updated = store
    .update_order(original.id, OrderPatch {
      filling: Some("Chocolate ganache".into()),
      quantity: Some(2),
      payment_status: Some(PaymentStatus::Paid),
      ..Default::default()
    })
    .await
    .expect("update order")
    .expect("order exists");

  let mut expected = original.clone();
  expected.filling = Some("Chocolate ganache".into());
  expected.quantity = 2;
  expected.payment_status = Some(PaymentStatus::Paid);
  expected.updated_at = original.updated_at + Duration::hours(1);
  assert_eq!(updated, expected);

  let details = store
    .get_order(original.id)
    .await
    .expect("get order")
    .expect("order visible");
  assert_eq!(details.order, expected);
}

async fn log_count<S: OrderStore>(store: &S, id: i64) -> usize {
  store
    .get_order(id)
    .await
    .expect("get order")
    .expect("order visible")
    .logs
    .len()
}

/// A status change appends exactly one entry; no change appends none.
pub async fn status_change_is_logged_once<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Amy").await;
  let order = store
    .create_order(order_for(c, "Tart", today, days_from(today, 1)))
    .await
    .expect("create order");

  assert_eq!(log_count(store, order.id).await, 1);

  store
    .update_order(order.id, OrderPatch::status(OrderStatus::InProgress))
    .await
    .expect("update order");
  assert_eq!(log_count(store, order.id).await, 1, "same status must not log");

  store
    .update_order(order.id, OrderPatch { flavor: Some("Lemon".into()), ..Default::default() })
    .await
    .expect("update order");
  assert_eq!(log_count(store, order.id).await, 1, "absent status must not log");

  store
    .update_order(order.id, OrderPatch::status(OrderStatus::Completed))
    .await
    .expect("update order");
  assert_eq!(log_count(store, order.id).await, 2);

  store
    .update_order(order.id, OrderPatch::status(OrderStatus::InProgress))
    .await
    .expect("update order");
  let details = store.get_order(order.id).await.expect("get order").expect("visible");
  assert_eq!(details.logs.len(), 3);
  assert_eq!(
    details.logs[2].description.as_deref(),
    Some("Order status changed from completed to in_progress")
  );
}

/// Orders delivered more than 14 days ago vanish from every read view.
pub async fn stale_orders_are_hidden<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Amy").await;

  let mut ids = Vec::new();
  for offset in [-20, -15, -14, -13, 3] {
    let o = store
      .create_order(order_for(c, "Sponge", today, days_from(today, offset)))
      .await
      .expect("create order");
    ids.push(o.id);
  }
  let [d20, d15, d14, d13, future]: [i64; 5] = ids.try_into().expect("five orders");

  let visible: Vec<i64> = store
    .get_orders()
    .await
    .expect("get orders")
    .into_iter()
    .map(|d| d.order.id)
    .collect();
  assert_eq!(visible, vec![d14, d13, future]);

  assert!(store.get_order(d20).await.expect("get order").is_none());
  assert!(store.get_order(d15).await.expect("get order").is_none());
  assert!(store.get_order(d14).await.expect("get order").is_some());

  let calendar: Vec<i64> = store
    .get_calendar_events()
    .await
    .expect("calendar")
    .into_iter()
    .map(|e| e.id)
    .collect();
  assert_eq!(calendar, vec![d14, d13, future]);

  // Hidden orders still exist and can still be written to.
  assert!(
    store
      .update_order(d20, OrderPatch::status(OrderStatus::Completed))
      .await
      .expect("update order")
      .is_some()
  );

  // The boundary slides one day per day.
  clock.advance(Duration::days(1));
  let visible: Vec<i64> = store
    .get_orders()
    .await
    .expect("get orders")
    .into_iter()
    .map(|d| d.order.id)
    .collect();
  assert_eq!(visible, vec![d13, future]);
  assert!(store.get_order(d14).await.expect("get order").is_none());

  clock.set(clock.now() + Duration::days(1));
  let visible: Vec<i64> = store
    .get_orders()
    .await
    .expect("get orders")
    .into_iter()
    .map(|d| d.order.id)
    .collect();
  assert_eq!(visible, vec![future]);
  assert!(store.get_order(d13).await.expect("get order").is_none());
}

/// Calendar events come back ordered by delivery date.
pub async fn calendar_is_ordered_by_date<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Sarah Johnson").await;

  for (cake, offset, name) in [
    ("Graduation Cake", 21, Some("Mike Chen")),
    ("Wedding Cake", 14, Some("Sarah Johnson")),
    ("Baby Shower Cake", 5, None),
    ("Anniversary Cake", 10, Some("Sarah Johnson")),
  ] {
    let mut input = order_for(c, cake, today, days_from(today, offset));
    input.customer_name = name.map(str::to_owned);
    store.create_order(input).await.expect("create order");
  }

  let events = store.get_calendar_events().await.expect("calendar");
  let dates: Vec<NaiveDate> = events.iter().map(|e| e.date).collect();
  let mut sorted = dates.clone();
  sorted.sort();
  assert_eq!(dates, sorted);

  assert_eq!(events[0].title, "Baby Shower Cake - Unknown Customer");
  assert_eq!(events[0].customer_name, "Unknown Customer");
  assert_eq!(events[3].title, "Graduation Cake - Mike Chen");
}

/// Create a customer and an order, complete it, and read it back joined.
pub async fn order_lifecycle_scenario<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let amy = store
    .create_customer(NewCustomer::new("Amy"))
    .await
    .expect("create customer");
  assert_eq!(amy.id, 1);

  let order = store
    .create_order(order_for(amy.id, "Birthday", today, days_from(today, 3)))
    .await
    .expect("create order");
  assert_eq!(order.id, 1);
  assert_eq!(order.status, OrderStatus::InProgress);

  let updated = store
    .update_order(order.id, OrderPatch::status(OrderStatus::Completed))
    .await
    .expect("update order")
    .expect("order exists");
  assert_eq!(updated.status, OrderStatus::Completed);

  let details = store.get_order(1).await.expect("get order").expect("visible");
  assert_eq!(details.customer.as_ref().map(|c| c.name.as_str()), Some("Amy"));
  assert!(details.images.is_empty());
  assert_eq!(details.logs.len(), 2);
  assert_eq!(details.logs[0].action, "Order Created");
  assert_eq!(details.logs[0].description.as_deref(), Some("New birthday order created"));
  assert_eq!(details.logs[1].action, "Status Updated");
  assert_eq!(
    details.logs[1].description.as_deref(),
    Some("Order status changed from in_progress to completed")
  );
}

/// Attaching an image stores it and appends one "Image Added" entry.
pub async fn image_attach_is_logged<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Amy").await;
  let order = store
    .create_order(order_for(c, "Wedding Cake", today, days_from(today, 30)))
    .await
    .expect("create order");

  let image = store
    .add_order_image(NewOrderImage {
      order_id:   order.id,
      image_url:  "https://img.example/reference.png".into(),
      image_name: Some("reference.png".into()),
    })
    .await
    .expect("add image");
  assert_eq!(image.uploaded_at, clock.now());

  let details = store.get_order(order.id).await.expect("get order").expect("visible");
  assert_eq!(details.images, vec![image]);
  assert_eq!(details.logs.len(), 2);
  assert_eq!(details.logs[1].action, "Image Added");
  assert_eq!(
    details.logs[1].description.as_deref(),
    Some("Image \"reference.png\" uploaded")
  );
  assert_eq!(details.logs[1].user_name.as_deref(), Some("Admin"));
}

/// Joined data only ever comes from the order's own rows, and the customer
/// snapshot on the order is independent of the live customer record.
pub async fn joins_are_scoped_to_the_order<S: OrderStore>(store: &S, clock: &FixedClock) {
  let today = clock.today();
  let c = customer(store, "Sarah Johnson").await;

  let mut first = order_for(c, "Wedding Cake", today, days_from(today, 14));
  first.customer_name = Some("Sarah Johnson".into());
  let first = store.create_order(first).await.expect("create order");
  let second = store
    .create_order(order_for(999, "Pie", today, days_from(today, 2)))
    .await
    .expect("create order");

  store
    .add_order_log(NewOrderLog {
      order_id:    second.id,
      action:      "Called customer".into(),
      description: Some("Left voicemail".into()),
      user_name:   Some("Baker".into()),
    })
    .await
    .expect("add log");

  store
    .update_customer(c, CustomerPatch { name: Some("Sarah Miller".into()), ..Default::default() })
    .await
    .expect("update customer");

  let orders = store.get_orders().await.expect("get orders");
  assert_eq!(orders.len(), 2);

  let a = &orders[0];
  assert_eq!(a.order.id, first.id);
  assert_eq!(a.logs.len(), 1);
  assert_eq!(a.order.customer_name.as_deref(), Some("Sarah Johnson"));
  assert_eq!(a.customer.as_ref().map(|c| c.name.as_str()), Some("Sarah Miller"));

  let b = &orders[1];
  assert!(b.customer.is_none(), "dangling customer ids resolve to nothing");
  assert_eq!(b.logs.len(), 2);
  assert_eq!(b.logs[1].user_name.as_deref(), Some("Baker"));
}
