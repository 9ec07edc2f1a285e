use std::sync::Arc;

use axum::{
  body::Body,
  http::{Request, StatusCode, header},
};
use bakery_core::clock::FixedClock;
use bakery_store_memory::MemoryStore;
use chrono::{Duration, NaiveDate};
use serde_json::Value;
use tower::ServiceExt as _;

use super::*;

fn make_state() -> (ApiState<MemoryStore>, Arc<FixedClock>) {
  let clock = Arc::new(FixedClock::at_date(
    NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
  ));
  let store = MemoryStore::with_clock(clock.clone());
  (ApiState::new(Arc::new(store), clock.clone()), clock)
}

async fn send(
  state: &ApiState<MemoryStore>,
  method: &str,
  uri: &str,
  content_type: Option<&str>,
  body: &str,
) -> (StatusCode, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  if let Some(ct) = content_type {
    builder = builder.header(header::CONTENT_TYPE, ct);
  }
  let req = builder.body(Body::from(body.to_string())).unwrap();
  let resp = api_router(state.clone()).oneshot(req).await.unwrap();
  let status = resp.status();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let json = if bytes.is_empty() {
    Value::Null
  } else {
    serde_json::from_slice(&bytes).unwrap()
  };
  (status, json)
}

const FORM: Option<&str> = Some("application/x-www-form-urlencoded");
const JSON: Option<&str> = Some("application/json");

async fn get(state: &ApiState<MemoryStore>, uri: &str) -> (StatusCode, Value) {
  send(state, "GET", uri, None, "").await
}

async fn post_form(state: &ApiState<MemoryStore>, uri: &str, body: &str) -> (StatusCode, Value) {
  send(state, "POST", uri, FORM, body).await
}

// ── Customers ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn customer_create_get_and_patch() {
  let (state, _) = make_state();

  let (status, created) =
    post_form(&state, "/customers", "name=Ada+Baker&email=ada%40example.com&phone=").await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(created["id"], 1);
  assert_eq!(created["name"], "Ada Baker");
  assert_eq!(created["phone"], Value::Null);

  let (status, patched) =
    send(&state, "PATCH", "/customers/1", FORM, "name=&phone=555-0100").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(patched["name"], "Ada Baker");
  assert_eq!(patched["email"], "ada@example.com");
  assert_eq!(patched["phone"], "555-0100");

  let (status, fetched) = get(&state, "/customers/1").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(fetched, patched);

  let (status, all) = get(&state, "/customers").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(all.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn customer_without_name_is_rejected() {
  let (state, _) = make_state();
  let (status, body) = post_form(&state, "/customers", "name=++&email=x%40y.z").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].as_str().unwrap().contains("name"));

  let (_, all) = get(&state, "/customers").await;
  assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_customer_is_404() {
  let (state, _) = make_state();
  let (status, body) = get(&state, "/customers/7").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert!(body["error"].is_string());

  let (status, _) = send(&state, "PATCH", "/customers/7", FORM, "name=Ghost").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Orders ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn order_form_defaults_and_joined_read() {
  let (state, _) = make_state();
  post_form(&state, "/customers", "name=Amy").await;

  let (status, order) = post_form(
    &state,
    "/orders",
    "customer_id=1&customer_name=Amy&cake_type=Birthday+Cake&delivery_date=2024-03-15\
     &delivery_time=14%3A30&price=&card_sec_code=123",
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(order["id"], 1);
  assert_eq!(order["quantity"], 1);
  assert_eq!(order["order_date"], "2024-03-10");
  assert_eq!(order["delivery_time"], "14:30:00");
  assert_eq!(order["status"], "in_progress");
  assert_eq!(order["price"], Value::Null);
  assert!(order.get("card_sec_code").is_none());

  let (status, details) = get(&state, "/orders/1").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(details["cake_type"], "Birthday Cake");
  assert_eq!(details["customer"]["name"], "Amy");
  assert_eq!(details["images"], Value::Array(vec![]));
  let logs = details["logs"].as_array().unwrap();
  assert_eq!(logs.len(), 1);
  assert_eq!(logs[0]["description"], "New birthday cake order created");
  assert_eq!(logs[0]["user_name"], "Admin");
}

#[tokio::test]
async fn malformed_order_form_is_400() {
  let (state, _) = make_state();
  for body in [
    "cake_type=Cake&delivery_date=2024-03-15",
    "customer_id=1&delivery_date=2024-03-15",
    "customer_id=abc&cake_type=Cake&delivery_date=2024-03-15",
    "customer_id=1&cake_type=Cake&delivery_date=15%2F03%2F2024",
    "customer_id=1&cake_type=Cake&delivery_date=2024-03-15&quantity=0",
    "customer_id=1&cake_type=Cake&delivery_date=2024-03-15&status=pending",
  ] {
    let (status, resp) = post_form(&state, "/orders", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
    assert!(resp["error"].is_string());
  }
  let (_, all) = get(&state, "/orders").await;
  assert!(all.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn status_route_logs_only_real_transitions() {
  let (state, _) = make_state();
  post_form(&state, "/orders", "customer_id=1&cake_type=Cupcakes&delivery_date=2024-03-12").await;

  let (status, order) =
    send(&state, "PUT", "/orders/1/status", JSON, r#"{"status":"completed"}"#).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(order["status"], "completed");

  // Same status again: no new log entry.
  send(&state, "PUT", "/orders/1/status", JSON, r#"{"status":"completed"}"#).await;

  let (_, details) = get(&state, "/orders/1").await;
  let logs = details["logs"].as_array().unwrap();
  assert_eq!(logs.len(), 2);
  assert_eq!(logs[1]["action"], "Status Updated");
  assert_eq!(
    logs[1]["description"],
    "Order status changed from in_progress to completed"
  );

  let (status, _) =
    send(&state, "PUT", "/orders/1/status", JSON, r#"{"status":"shipped"}"#).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  let (status, _) =
    send(&state, "PUT", "/orders/9/status", JSON, r#"{"status":"completed"}"#).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn patch_merges_only_filled_fields() {
  let (state, _) = make_state();
  post_form(
    &state,
    "/orders",
    "customer_id=1&cake_type=Wedding+Cake&flavor=Vanilla&delivery_date=2024-04-01",
  )
  .await;

  let (status, order) =
    send(&state, "PATCH", "/orders/1", FORM, "flavor=&filling=Lemon&quantity=3").await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(order["flavor"], "Vanilla");
  assert_eq!(order["filling"], "Lemon");
  assert_eq!(order["quantity"], 3);

  let (status, _) = send(&state, "PATCH", "/orders/2", FORM, "flavor=Mocha").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stale_orders_vanish_from_reads_and_reject_attachments() {
  let (state, clock) = make_state();
  post_form(&state, "/orders", "customer_id=1&cake_type=Pie&delivery_date=2024-03-10").await;

  clock.advance(Duration::days(14));
  let (status, _) = get(&state, "/orders/1").await;
  assert_eq!(status, StatusCode::OK);

  clock.advance(Duration::days(1));
  let (status, _) = get(&state, "/orders/1").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (_, all) = get(&state, "/orders").await;
  assert!(all.as_array().unwrap().is_empty());

  let (status, _) = post_form(&state, "/orders/1/images", "image_url=%2Fimg%2Fpie.jpg").await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _) =
    send(&state, "POST", "/orders/1/logs", JSON, r#"{"action":"Note"}"#).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ── Attachments ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn image_and_manual_log_are_attached() {
  let (state, _) = make_state();
  post_form(&state, "/orders", "customer_id=1&cake_type=Tart&delivery_date=2024-03-20").await;

  let (status, image) = post_form(
    &state,
    "/orders/1/images",
    "image_url=%2Fimg%2Ftart.jpg&image_name=tart.jpg",
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(image["order_id"], 1);

  let (status, _) = post_form(&state, "/orders/1/images", "image_name=nothing").await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, log) = send(
    &state,
    "POST",
    "/orders/1/logs",
    JSON,
    r#"{"action":"Customer Called","description":"Asked for extra icing"}"#,
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(log["user_name"], "Admin");

  let (status, bare) = send(
    &state,
    "POST",
    "/orders/1/logs",
    JSON,
    r#"{"action":"Picked Up","description":"  ","user_name":""}"#,
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(bare["description"], Value::Null);
  assert_eq!(bare["user_name"], "Admin");

  let (status, _) = send(&state, "POST", "/orders/1/logs", JSON, r#"{"action":"  "}"#).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, details) = get(&state, "/orders/1").await;
  assert_eq!(details["images"].as_array().unwrap().len(), 1);
  let actions: Vec<&str> = details["logs"]
    .as_array()
    .unwrap()
    .iter()
    .map(|l| l["action"].as_str().unwrap())
    .collect();
  assert_eq!(actions, ["Order Created", "Image Added", "Customer Called", "Picked Up"]);
  assert_eq!(
    details["logs"][1]["description"],
    "Image \"tart.jpg\" uploaded"
  );
}

// ── Calendar ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn calendar_lists_active_orders_by_date() {
  let (state, _) = make_state();
  for (name, date) in [("Cara", "2024-03-20"), ("", "2024-03-12"), ("Dev", "2024-02-01")] {
    post_form(
      &state,
      "/orders",
      &format!("customer_id=1&customer_name={name}&cake_type=Cake&delivery_date={date}"),
    )
    .await;
  }

  let (status, events) = get(&state, "/calendar").await;
  assert_eq!(status, StatusCode::OK);
  let events = events.as_array().unwrap();
  assert_eq!(events.len(), 2);
  assert_eq!(events[0]["id"], 2);
  assert_eq!(events[0]["title"], "Cake - Unknown Customer");
  assert_eq!(events[1]["title"], "Cake - Cara");
  assert_eq!(events[1]["date"], "2024-03-20");
}
