//! Handlers for `/orders` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/orders` | Active orders with customer, images and logs |
//! | `POST`  | `/orders` | Form body; `customer_id`, `cake_type`, `delivery_date` required |
//! | `GET`   | `/orders/{id}` | 404 if absent or older than the active window |
//! | `PATCH` | `/orders/{id}` | Form body; blank fields are left unchanged |
//! | `PUT`   | `/orders/{id}/status` | Body: `{"status":"completed"}` |
//! | `POST`  | `/orders/{id}/images` | Form body; `image_url` required |
//! | `POST`  | `/orders/{id}/logs` | Body: `{"action":"note","description":"..."}` |
//!
//! Images and manual log entries can only be attached to an order that is
//! currently visible through `GET /orders/{id}`. The visibility check and the
//! write are separate store calls, not one transaction: an order that ages
//! out between the two still receives the attachment.

use std::collections::HashMap;

use axum::{
  Form,
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bakery_core::{
  audit::{NewOrderLog, SYSTEM_ACTOR},
  form,
  order::{Order, OrderPatch, OrderStatus},
  store::OrderStore,
  view::OrderDetails,
};
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

fn not_found(id: i64) -> ApiError { ApiError::NotFound(format!("order {id}")) }

/// 404 unless `id` resolves to an active order.
async fn ensure_visible<S: OrderStore>(store: &S, id: i64) -> Result<(), ApiError> {
  match store.get_order(id).await.map_err(ApiError::store)? {
    Some(_) => Ok(()),
    None => Err(not_found(id)),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /orders`
pub async fn list<S: OrderStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<OrderDetails>>, ApiError> {
  let orders = state.store.get_orders().await.map_err(ApiError::store)?;
  Ok(Json(orders))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /orders`
pub async fn create<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form::new_order(&fields, state.clock.today())?;
  let order = state
    .store
    .create_order(input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(
    order_id = order.id,
    delivery_date = %order.delivery_date,
    "order created"
  );
  Ok((StatusCode::CREATED, Json(order)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /orders/{id}`
pub async fn get_one<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<OrderDetails>, ApiError> {
  state
    .store
    .get_order(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /orders/{id}`
pub async fn update<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<Order>, ApiError> {
  let patch = form::order_patch(&fields)?;
  state
    .store
    .update_order(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

#[derive(Debug, Deserialize)]
pub struct StatusBody {
  pub status: String,
}

/// `PUT /orders/{id}/status`
pub async fn update_status<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<StatusBody>,
) -> Result<Json<Order>, ApiError> {
  let status = OrderStatus::parse(&body.status)?;
  state
    .store
    .update_order(id, OrderPatch::status(status))
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| not_found(id))
}

// ─── Attachments ──────────────────────────────────────────────────────────────

/// `POST /orders/{id}/images`
pub async fn add_image<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form::new_order_image(id, &fields)?;
  ensure_visible(state.store.as_ref(), id).await?;
  let image = state
    .store
    .add_order_image(input)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(image)))
}

#[derive(Debug, Deserialize)]
pub struct LogBody {
  pub action:      String,
  pub description: Option<String>,
  pub user_name:   Option<String>,
}

/// `POST /orders/{id}/logs`
pub async fn add_log<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Json(body): Json<LogBody>,
) -> Result<impl IntoResponse, ApiError> {
  let action = body.action.trim();
  if action.is_empty() {
    return Err(ApiError::BadRequest("missing required field `action`".into()));
  }
  ensure_visible(state.store.as_ref(), id).await?;

  let entry = NewOrderLog {
    order_id:    id,
    action:      action.to_owned(),
    description: body.description.filter(|d| !d.trim().is_empty()),
    user_name:   Some(
      body
        .user_name
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| SYSTEM_ACTOR.to_owned()),
    ),
  };
  let log = state
    .store
    .add_order_log(entry)
    .await
    .map_err(ApiError::store)?;
  Ok((StatusCode::CREATED, Json(log)))
}
