//! Coercion of loosely-typed form submissions into typed inputs.
//!
//! Presentation layers submit flat `key → string` maps. Blank values are
//! treated as absent, never as empty strings, so an update form can only
//! overwrite fields the user actually filled in. The security code of a card
//! may be submitted but is never carried into any record.

use std::{collections::HashMap, str::FromStr};

use chrono::{NaiveDate, NaiveTime};

use crate::{
  FormError,
  audit::NewOrderImage,
  customer::{CustomerPatch, NewCustomer},
  order::{NewOrder, OrderPatch, OrderStatus, PaymentStatus},
};

type Result<T> = std::result::Result<T, FormError>;

/// Read-only accessor over a submitted form.
struct Fields<'a> {
  map: &'a HashMap<String, String>,
}

impl<'a> Fields<'a> {
  fn new(map: &'a HashMap<String, String>) -> Self { Self { map } }

  /// Trimmed, non-blank value of `key`.
  fn raw(&self, key: &str) -> Option<&'a str> {
    self
      .map
      .get(key)
      .map(|v| v.trim())
      .filter(|v| !v.is_empty())
  }

  fn text(&self, key: &str) -> Option<String> { self.raw(key).map(str::to_owned) }

  fn required(&self, key: &'static str) -> Result<String> {
    self.text(key).ok_or(FormError::Missing(key))
  }

  fn integer(&self, key: &'static str) -> Result<Option<i64>> {
    self
      .raw(key)
      .map(|v| {
        v.parse::<i64>().map_err(|_| FormError::InvalidNumber {
          field: key,
          value: v.to_owned(),
        })
      })
      .transpose()
  }

  fn quantity(&self) -> Result<Option<u32>> {
    const KEY: &str = "quantity";
    match self.integer(KEY)? {
      None => Ok(None),
      Some(q) => u32::try_from(q)
        .ok()
        .filter(|q| *q >= 1)
        .map(Some)
        .ok_or_else(|| FormError::OutOfRange { field: KEY, value: q.to_string() }),
    }
  }

  fn price(&self) -> Result<Option<f64>> {
    const KEY: &str = "price";
    let Some(v) = self.raw(KEY) else { return Ok(None) };
    let price = v
      .parse::<f64>()
      .ok()
      .filter(|p| p.is_finite())
      .ok_or_else(|| FormError::InvalidNumber { field: KEY, value: v.to_owned() })?;
    if price < 0.0 {
      return Err(FormError::OutOfRange { field: KEY, value: v.to_owned() });
    }
    Ok(Some(price))
  }

  fn date(&self, key: &'static str) -> Result<Option<NaiveDate>> {
    self
      .raw(key)
      .map(|v| {
        NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| FormError::InvalidDate {
          field: key,
          value: v.to_owned(),
        })
      })
      .transpose()
  }

  fn time(&self, key: &'static str) -> Result<Option<NaiveTime>> {
    self
      .raw(key)
      .map(|v| {
        NaiveTime::parse_from_str(v, "%H:%M:%S")
          .or_else(|_| NaiveTime::parse_from_str(v, "%H:%M"))
          .map_err(|_| FormError::InvalidDate { field: key, value: v.to_owned() })
      })
      .transpose()
  }

  fn parsed<T: FromStr>(&self, key: &'static str) -> Result<Option<T>> {
    self
      .raw(key)
      .map(|v| {
        v.parse::<T>().map_err(|_| FormError::InvalidValue {
          field: key,
          value: v.to_owned(),
        })
      })
      .transpose()
  }
}

// ─── Customers ───────────────────────────────────────────────────────────────

/// Coerce a "new customer" form. `name` is required.
pub fn new_customer(form: &HashMap<String, String>) -> Result<NewCustomer> {
  let f = Fields::new(form);
  Ok(NewCustomer {
    name:    f.required("name")?,
    email:   f.text("email"),
    phone:   f.text("phone"),
    address: f.text("address"),
  })
}

/// Coerce an "edit customer" form into a partial update.
pub fn customer_patch(form: &HashMap<String, String>) -> Result<CustomerPatch> {
  let f = Fields::new(form);
  Ok(CustomerPatch {
    name:    f.text("name"),
    email:   f.text("email"),
    phone:   f.text("phone"),
    address: f.text("address"),
  })
}

// ─── Orders ──────────────────────────────────────────────────────────────────

/// Coerce a "new order" form.
///
/// `customer_id`, `cake_type` and `delivery_date` are required. `quantity`
/// defaults to 1, `order_date` to `today`, and `status` to `in_progress`.
pub fn new_order(form: &HashMap<String, String>, today: NaiveDate) -> Result<NewOrder> {
  let f = Fields::new(form);
  Ok(NewOrder {
    customer_id:          f.integer("customer_id")?.ok_or(FormError::Missing("customer_id"))?,
    customer_name:        f.text("customer_name"),
    customer_phone:       f.text("customer_phone"),
    cake_type:            f.required("cake_type")?,
    cake_size:            f.text("cake_size"),
    flavor:               f.text("flavor"),
    filling:              f.text("filling"),
    frosting:             f.text("frosting"),
    decorations:          f.text("decorations"),
    special_instructions: f.text("special_instructions"),
    quantity:             f.quantity()?.unwrap_or(1),
    price:                f.price()?,
    order_date:           f.date("order_date")?.unwrap_or(today),
    delivery_date:        f.date("delivery_date")?.ok_or(FormError::Missing("delivery_date"))?,
    delivery_time:        f.time("delivery_time")?,
    delivery_address:     f.text("delivery_address"),
    status:               f.parsed::<OrderStatus>("status")?.unwrap_or_default(),
    card_number:          f.text("card_number"),
    card_exp_date:        f.text("card_exp_date"),
    zip_code:             f.text("zip_code"),
    payment_status:       f.parsed::<PaymentStatus>("payment_status")?,
  })
}

/// Coerce an "edit order" form into a partial update.
pub fn order_patch(form: &HashMap<String, String>) -> Result<OrderPatch> {
  let f = Fields::new(form);
  Ok(OrderPatch {
    customer_id:          f.integer("customer_id")?,
    customer_name:        f.text("customer_name"),
    customer_phone:       f.text("customer_phone"),
    cake_type:            f.text("cake_type"),
    cake_size:            f.text("cake_size"),
    flavor:               f.text("flavor"),
    filling:              f.text("filling"),
    frosting:             f.text("frosting"),
    decorations:          f.text("decorations"),
    special_instructions: f.text("special_instructions"),
    quantity:             f.quantity()?,
    price:                f.price()?,
    order_date:           f.date("order_date")?,
    delivery_date:        f.date("delivery_date")?,
    delivery_time:        f.time("delivery_time")?,
    delivery_address:     f.text("delivery_address"),
    status:               f.parsed("status")?,
    card_number:          f.text("card_number"),
    card_exp_date:        f.text("card_exp_date"),
    zip_code:             f.text("zip_code"),
    payment_status:       f.parsed("payment_status")?,
  })
}

/// Coerce an "attach image" form for `order_id`. `image_url` is required.
pub fn new_order_image(
  order_id: i64,
  form: &HashMap<String, String>,
) -> Result<NewOrderImage> {
  let f = Fields::new(form);
  Ok(NewOrderImage {
    order_id,
    image_url: f.required("image_url")?,
    image_name: f.text("image_name"),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
      .iter()
      .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
      .collect()
  }

  fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2024, 4, 2).unwrap() }

  #[test]
  fn new_order_applies_defaults_and_drops_blanks() {
    let input = new_order(
      &form(&[
        ("customer_id", "1"),
        ("cake_type", "Birthday"),
        ("delivery_date", "2024-04-05"),
        ("delivery_time", "15:00"),
        ("flavor", "  "),
        ("price", ""),
        ("card_sec_code", "123"),
      ]),
      today(),
    )
    .unwrap();

    assert_eq!(input.customer_id, 1);
    assert_eq!(input.quantity, 1);
    assert_eq!(input.order_date, today());
    assert_eq!(input.delivery_date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
    assert_eq!(input.delivery_time, NaiveTime::from_hms_opt(15, 0, 0));
    assert_eq!(input.status, OrderStatus::InProgress);
    assert!(input.flavor.is_none());
    assert!(input.price.is_none());
  }

  #[test]
  fn new_order_requires_core_fields() {
    let err = new_order(&form(&[("customer_id", "1"), ("cake_type", "Birthday")]), today())
      .unwrap_err();
    assert_eq!(err, FormError::Missing("delivery_date"));

    let err = new_order(&form(&[("cake_type", "Birthday")]), today()).unwrap_err();
    assert_eq!(err, FormError::Missing("customer_id"));
  }

  #[test]
  fn numeric_and_enum_fields_are_checked() {
    let base = [("customer_id", "1"), ("cake_type", "Tart"), ("delivery_date", "2024-04-05")];

    let mut bad = base.to_vec();
    bad.push(("quantity", "0"));
    assert!(matches!(
      new_order(&form(&bad), today()),
      Err(FormError::OutOfRange { field: "quantity", .. })
    ));

    let mut bad = base.to_vec();
    bad.push(("price", "abc"));
    assert!(matches!(
      new_order(&form(&bad), today()),
      Err(FormError::InvalidNumber { field: "price", .. })
    ));

    let mut bad = base.to_vec();
    bad.push(("status", "pending"));
    assert!(matches!(
      new_order(&form(&bad), today()),
      Err(FormError::InvalidValue { field: "status", .. })
    ));

    let mut ok = base.to_vec();
    ok.extend([("price", "12.50"), ("quantity", "3"), ("payment_status", "paid")]);
    let input = new_order(&form(&ok), today()).unwrap();
    assert_eq!(input.price, Some(12.5));
    assert_eq!(input.quantity, 3);
    assert_eq!(input.payment_status, Some(PaymentStatus::Paid));
  }

  #[test]
  fn patch_contains_only_filled_fields() {
    let patch = order_patch(&form(&[
      ("status", "completed"),
      ("cake_type", ""),
      ("quantity", "2"),
    ]))
    .unwrap();

    assert_eq!(patch, OrderPatch {
      status: Some(OrderStatus::Completed),
      quantity: Some(2),
      ..Default::default()
    });

    let patch = customer_patch(&form(&[("name", ""), ("email", "amy@example.com")])).unwrap();
    assert!(patch.name.is_none());
    assert_eq!(patch.email.as_deref(), Some("amy@example.com"));
  }

  #[test]
  fn customer_name_is_required() {
    assert_eq!(new_customer(&form(&[("email", "x@y.z")])), Err(FormError::Missing("name")));
  }
}
