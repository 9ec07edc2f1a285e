//! Demo data for a fresh order book.
//!
//! Everything is written through the ordinary [`OrderStore`] operations, so
//! the resulting audit trail is exactly what real usage would produce.

use bakery_core::{
  customer::{Customer, NewCustomer},
  order::{NewOrder, OrderPatch, OrderStatus, PaymentStatus},
  store::OrderStore,
};
use chrono::{Days, NaiveDate, NaiveTime};

struct DemoCustomer {
  name:    &'static str,
  email:   &'static str,
  phone:   &'static str,
  address: &'static str,
}

const CUSTOMERS: [DemoCustomer; 2] = [
  DemoCustomer {
    name:    "Sarah Johnson",
    email:   "sarah@email.com",
    phone:   "(555) 123-4567",
    address: "123 Main St, Anytown, ST 12345",
  },
  DemoCustomer {
    name:    "Mike Chen",
    email:   "mike.chen@email.com",
    phone:   "(555) 987-6543",
    address: "456 Oak Ave, Somewhere, ST 67890",
  },
];

struct DemoOrder {
  /// Index into [`CUSTOMERS`].
  customer:     usize,
  cake_type:    &'static str,
  cake_size:    &'static str,
  flavor:       &'static str,
  filling:      &'static str,
  frosting:     &'static str,
  decorations:  &'static str,
  instructions: &'static str,
  price:        f64,
  due_in_days:  u64,
  due_hour:     u32,
  address:      &'static str,
  /// Masked card number, expiry and billing zip for card payments.
  card:         Option<(&'static str, &'static str, &'static str)>,
  payment:      PaymentStatus,
  completed:    bool,
}

const ORDERS: [DemoOrder; 5] = [
  DemoOrder {
    customer:     0,
    cake_type:    "Wedding Cake",
    cake_size:    "3-tier",
    flavor:       "Vanilla",
    filling:      "Strawberry",
    frosting:     "Buttercream",
    decorations:  "White roses, pearl details",
    instructions: "Gluten-free option needed",
    price:        450.0,
    due_in_days:  14,
    due_hour:     15,
    address:      "123 Main St, Anytown, ST 12345",
    card:         Some(("**** **** **** 1234", "12/26", "12345")),
    payment:      PaymentStatus::Paid,
    completed:    false,
  },
  DemoOrder {
    customer:     1,
    cake_type:    "Birthday Cake",
    cake_size:    "8 inch round",
    flavor:       "Chocolate",
    filling:      "Chocolate ganache",
    frosting:     "Chocolate buttercream",
    decorations:  "Happy Birthday message, colorful sprinkles",
    instructions: "Please write \"Happy 25th Birthday Mike!\"",
    price:        85.0,
    due_in_days:  7,
    due_hour:     12,
    address:      "456 Oak Ave, Somewhere, ST 67890",
    card:         None,
    payment:      PaymentStatus::Pending,
    completed:    false,
  },
  DemoOrder {
    customer:     0,
    cake_type:    "Anniversary Cake",
    cake_size:    "10 inch round",
    flavor:       "Red Velvet",
    filling:      "Cream cheese",
    frosting:     "Cream cheese frosting",
    decorations:  "Gold accents, anniversary message",
    instructions: "Please write '25 Years Together'",
    price:        120.0,
    due_in_days:  10,
    due_hour:     14,
    address:      "123 Main St, Anytown, ST 12345",
    card:         None,
    payment:      PaymentStatus::Paid,
    completed:    true,
  },
  DemoOrder {
    customer:     1,
    cake_type:    "Graduation Cake",
    cake_size:    "Sheet cake",
    flavor:       "Funfetti",
    filling:      "Vanilla",
    frosting:     "Buttercream",
    decorations:  "Graduation cap, school colors",
    instructions: "Blue and gold theme",
    price:        95.0,
    due_in_days:  21,
    due_hour:     16,
    address:      "456 Oak Ave, Somewhere, ST 67890",
    card:         Some(("**** **** **** 5678", "08/27", "67890")),
    payment:      PaymentStatus::Paid,
    completed:    false,
  },
  DemoOrder {
    customer:     0,
    cake_type:    "Baby Shower Cake",
    cake_size:    "8 inch round",
    flavor:       "Lemon",
    filling:      "Lemon curd",
    frosting:     "Swiss meringue buttercream",
    decorations:  "Pink and white flowers, baby theme",
    instructions: "Gender neutral decorations preferred",
    price:        85.0,
    due_in_days:  5,
    due_hour:     13,
    address:      "789 Pine St, Newtown, ST 54321",
    card:         None,
    payment:      PaymentStatus::Pending,
    completed:    false,
  },
];

impl DemoOrder {
  fn to_new_order(&self, customer: &Customer, today: NaiveDate) -> NewOrder {
    let mut order =
      NewOrder::new(customer.id, self.cake_type, today, today + Days::new(self.due_in_days));
    order.customer_name = Some(customer.name.clone());
    order.customer_phone = customer.phone.clone();
    order.cake_size = Some(self.cake_size.to_owned());
    order.flavor = Some(self.flavor.to_owned());
    order.filling = Some(self.filling.to_owned());
    order.frosting = Some(self.frosting.to_owned());
    order.decorations = Some(self.decorations.to_owned());
    order.special_instructions = Some(self.instructions.to_owned());
    order.price = Some(self.price);
    order.delivery_time = NaiveTime::from_hms_opt(self.due_hour, 0, 0);
    order.delivery_address = Some(self.address.to_owned());
    if let Some((number, expiry, zip)) = self.card {
      order.card_number = Some(number.to_owned());
      order.card_exp_date = Some(expiry.to_owned());
      order.zip_code = Some(zip.to_owned());
    }
    order.payment_status = Some(self.payment);
    order
  }
}

/// Populate an empty store with two customers and five upcoming orders.
///
/// Returns `false` without writing anything if the store already holds
/// customers.
pub async fn demo_data<S: OrderStore>(store: &S, today: NaiveDate) -> Result<bool, S::Error> {
  if !store.get_customers().await?.is_empty() {
    return Ok(false);
  }

  let mut customers = Vec::with_capacity(CUSTOMERS.len());
  for c in &CUSTOMERS {
    let input = NewCustomer {
      name:    c.name.to_owned(),
      email:   Some(c.email.to_owned()),
      phone:   Some(c.phone.to_owned()),
      address: Some(c.address.to_owned()),
    };
    customers.push(store.create_customer(input).await?);
  }

  for demo in &ORDERS {
    let order = store
      .create_order(demo.to_new_order(&customers[demo.customer], today))
      .await?;
    if demo.completed {
      store
        .update_order(order.id, OrderPatch::status(OrderStatus::Completed))
        .await?;
    }
  }

  tracing::info!(
    customers = CUSTOMERS.len(),
    orders = ORDERS.len(),
    "seeded demo data"
  );
  Ok(true)
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use bakery_core::clock::FixedClock;
  use bakery_store_memory::MemoryStore;

  use super::*;

  #[tokio::test]
  async fn seeds_once_with_full_audit_trail() {
    let today = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
    let store = MemoryStore::with_clock(Arc::new(FixedClock::at_date(today)));

    assert!(demo_data(&store, today).await.unwrap());
    assert!(!demo_data(&store, today).await.unwrap());

    assert_eq!(store.get_customers().await.unwrap().len(), 2);
    let orders = store.get_orders().await.unwrap();
    assert_eq!(orders.len(), 5);

    let anniversary = store.get_order(3).await.unwrap().unwrap();
    assert_eq!(anniversary.order.status, OrderStatus::Completed);
    assert_eq!(anniversary.logs.len(), 2);
    assert_eq!(
      anniversary.customer.map(|c| c.name).as_deref(),
      Some("Sarah Johnson")
    );

    let calendar = store.get_calendar_events().await.unwrap();
    let days: Vec<i64> = calendar
      .iter()
      .map(|e| (e.date - today).num_days())
      .collect();
    assert_eq!(days, [5, 7, 10, 14, 21]);
    assert_eq!(calendar[0].title, "Baby Shower Cake - Sarah Johnson");
  }
}
