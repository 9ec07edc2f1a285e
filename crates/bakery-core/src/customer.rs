//! Customers, the people orders are placed for.
//!
//! Customers are created once and updated by partial merge; they are never
//! deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored customer record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
  pub id:         i64,
  pub name:       String,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub address:    Option<String>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// Input to [`crate::store::OrderStore::create_customer`].
/// `id` and both timestamps are always assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewCustomer {
  pub name:    String,
  pub email:   Option<String>,
  pub phone:   Option<String>,
  pub address: Option<String>,
}

impl NewCustomer {
  pub fn new(name: impl Into<String>) -> Self {
    Self { name: name.into(), ..Self::default() }
  }

  /// Build the stored record once the store has picked an id and a time.
  pub fn into_customer(self, id: i64, now: DateTime<Utc>) -> Customer {
    Customer {
      id,
      name: self.name,
      email: self.email,
      phone: self.phone,
      address: self.address,
      created_at: now,
      updated_at: now,
    }
  }
}

/// A partial update: only `Some` fields overwrite the stored record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerPatch {
  pub name:    Option<String>,
  pub email:   Option<String>,
  pub phone:   Option<String>,
  pub address: Option<String>,
}

impl CustomerPatch {
  /// Shallow-merge onto `customer` and refresh `updated_at`.
  pub fn apply(self, customer: &mut Customer, now: DateTime<Utc>) {
    if let Some(name) = self.name {
      customer.name = name;
    }
    if let Some(email) = self.email {
      customer.email = Some(email);
    }
    if let Some(phone) = self.phone {
      customer.phone = Some(phone);
    }
    if let Some(address) = self.address {
      customer.address = Some(address);
    }
    customer.updated_at = now;
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn patch_overwrites_only_present_fields() {
    let created = Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap();
    let later = Utc.with_ymd_and_hms(2024, 2, 1, 9, 30, 0).unwrap();

    let mut customer = NewCustomer {
      name:    "Sarah Johnson".into(),
      email:   Some("sarah@email.com".into()),
      phone:   None,
      address: Some("123 Main St".into()),
    }
    .into_customer(1, created);

    CustomerPatch { phone: Some("(555) 123-4567".into()), ..Default::default() }
      .apply(&mut customer, later);

    assert_eq!(customer.name, "Sarah Johnson");
    assert_eq!(customer.email.as_deref(), Some("sarah@email.com"));
    assert_eq!(customer.phone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(customer.address.as_deref(), Some("123 Main St"));
    assert_eq!(customer.created_at, created);
    assert_eq!(customer.updated_at, later);
  }
}
