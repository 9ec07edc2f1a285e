//! Handlers for `/customers` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/customers` | All customers, in id order |
//! | `POST`  | `/customers` | Form body; `name` required |
//! | `GET`   | `/customers/{id}` | 404 if not found |
//! | `PATCH` | `/customers/{id}` | Form body; blank fields are left unchanged |

use std::collections::HashMap;

use axum::{
  Form,
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use bakery_core::{customer::Customer, form, store::OrderStore};

use crate::{ApiState, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /customers`
pub async fn list<S: OrderStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<Customer>>, ApiError> {
  let customers = state.store.get_customers().await.map_err(ApiError::store)?;
  Ok(Json(customers))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /customers`
pub async fn create<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Form(fields): Form<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
  let input = form::new_customer(&fields)?;
  let customer = state
    .store
    .create_customer(input)
    .await
    .map_err(ApiError::store)?;
  tracing::info!(customer_id = customer.id, "customer created");
  Ok((StatusCode::CREATED, Json(customer)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /customers/{id}`
pub async fn get_one<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
) -> Result<Json<Customer>, ApiError> {
  state
    .store
    .get_customer(id)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("customer {id}")))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /customers/{id}`
pub async fn update<S: OrderStore>(
  State(state): State<ApiState<S>>,
  Path(id): Path<i64>,
  Form(fields): Form<HashMap<String, String>>,
) -> Result<Json<Customer>, ApiError> {
  let patch = form::customer_patch(&fields)?;
  state
    .store
    .update_customer(id, patch)
    .await
    .map_err(ApiError::store)?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound(format!("customer {id}")))
}
