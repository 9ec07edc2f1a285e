//! Order attachments and the append-only audit trail.
//!
//! Both record types are owned by a single order and are only ever read back
//! by that order's id. Log entries are never updated or deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::order::{NewOrder, StatusChange};

/// Actor recorded on entries the store appends by itself.
pub const SYSTEM_ACTOR: &str = "Admin";

pub const ACTION_ORDER_CREATED: &str = "Order Created";
pub const ACTION_STATUS_UPDATED: &str = "Status Updated";
pub const ACTION_IMAGE_ADDED: &str = "Image Added";

// ─── Images ──────────────────────────────────────────────────────────────────

/// A picture attached to an order (reference photo, finished cake, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderImage {
  pub id:          i64,
  pub order_id:    i64,
  pub image_url:   String,
  pub image_name:  Option<String>,
  pub uploaded_at: DateTime<Utc>,
}

/// Input to [`crate::store::OrderStore::add_order_image`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderImage {
  pub order_id:   i64,
  pub image_url:  String,
  pub image_name: Option<String>,
}

impl NewOrderImage {
  pub fn into_image(self, id: i64, now: DateTime<Utc>) -> OrderImage {
    OrderImage {
      id,
      order_id: self.order_id,
      image_url: self.image_url,
      image_name: self.image_name,
      uploaded_at: now,
    }
  }
}

// ─── Logs ────────────────────────────────────────────────────────────────────

/// One immutable audit entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLog {
  pub id:          i64,
  pub order_id:    i64,
  /// Short label, e.g. "Order Created".
  pub action:      String,
  pub description: Option<String>,
  pub user_name:   Option<String>,
  pub created_at:  DateTime<Utc>,
}

/// Input to [`crate::store::OrderStore::add_order_log`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLog {
  pub order_id:    i64,
  pub action:      String,
  pub description: Option<String>,
  pub user_name:   Option<String>,
}

impl NewOrderLog {
  pub fn into_log(self, id: i64, now: DateTime<Utc>) -> OrderLog {
    OrderLog {
      id,
      order_id: self.order_id,
      action: self.action,
      description: self.description,
      user_name: self.user_name,
      created_at: now,
    }
  }

  fn system(order_id: i64, action: &str, description: String) -> Self {
    Self {
      order_id,
      action: action.to_owned(),
      description: Some(description),
      user_name: Some(SYSTEM_ACTOR.to_owned()),
    }
  }

  /// The entry appended when an order is created.
  pub fn order_created(order_id: i64, input: &NewOrder) -> Self {
    Self::system(
      order_id,
      ACTION_ORDER_CREATED,
      format!("New {} order created", input.cake_type.to_lowercase()),
    )
  }

  /// The entry appended when an update changes an order's status.
  pub fn status_updated(order_id: i64, change: StatusChange) -> Self {
    Self::system(
      order_id,
      ACTION_STATUS_UPDATED,
      format!("Order status changed from {} to {}", change.from, change.to),
    )
  }

  /// The entry appended when an image is attached.
  pub fn image_added(image: &NewOrderImage) -> Self {
    let description = match image.image_name.as_deref() {
      Some(name) => format!("Image \"{name}\" uploaded"),
      None => "Image uploaded".to_owned(),
    };
    Self::system(image.order_id, ACTION_IMAGE_ADDED, description)
  }
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::order::OrderStatus;

  #[test]
  fn trigger_descriptions() {
    let day = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let created = NewOrderLog::order_created(4, &NewOrder::new(1, "Wedding Cake", day, day));
    assert_eq!(created.action, "Order Created");
    assert_eq!(created.description.as_deref(), Some("New wedding cake order created"));
    assert_eq!(created.user_name.as_deref(), Some("Admin"));

    let updated = NewOrderLog::status_updated(4, StatusChange {
      from: OrderStatus::InProgress,
      to:   OrderStatus::Completed,
    });
    assert_eq!(
      updated.description.as_deref(),
      Some("Order status changed from in_progress to completed")
    );

    let image = NewOrderImage {
      order_id:   4,
      image_url:  "https://example.com/cake.jpg".into(),
      image_name: Some("cake.jpg".into()),
    };
    assert_eq!(
      NewOrderLog::image_added(&image).description.as_deref(),
      Some("Image \"cake.jpg\" uploaded")
    );
  }
}
