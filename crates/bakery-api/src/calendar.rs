//! Handler for `GET /calendar`: one event per active order, earliest
//! delivery first.

use axum::{Json, extract::State};
use bakery_core::{calendar::CalendarEvent, store::OrderStore};

use crate::{ApiState, error::ApiError};

/// `GET /calendar`
pub async fn events<S: OrderStore>(
  State(state): State<ApiState<S>>,
) -> Result<Json<Vec<CalendarEvent>>, ApiError> {
  let events = state
    .store
    .get_calendar_events()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(events))
}
