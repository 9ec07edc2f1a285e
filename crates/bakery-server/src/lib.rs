//! Server wiring for the bakery order book: configuration, backend
//! selection, demo data, and the top-level router.

pub mod seed;

use std::{path::PathBuf, sync::Arc};

use axum::Router;
use bakery_api::ApiState;
use bakery_core::{clock::Clock, store::OrderStore};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Which [`OrderStore`] implementation backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
  /// Lost on restart.
  Memory,
  #[default]
  Sqlite,
}

/// Runtime server configuration, deserialised from `config.toml` and
/// `BAKERY_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default)]
  pub backend:        Backend,
  /// Only read by the `sqlite` backend.
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  #[serde(default)]
  pub seed_demo_data: bool,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("~/.local/share/bakery/orders.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the served application: the JSON API nested under `/api`, with
/// request tracing.
pub fn app<S>(store: Arc<S>, clock: Arc<dyn Clock>) -> Router
where
  S: OrderStore + 'static,
{
  Router::new()
    .nest("/api", bakery_api::api_router(ApiState::new(store, clock)))
    .layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use bakery_core::clock::FixedClock;
  use bakery_store_memory::MemoryStore;
  use chrono::NaiveDate;
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn config_defaults_fill_missing_keys() {
    let cfg: ServerConfig = config::Config::builder()
      .set_override("backend", "memory")
      .unwrap()
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();
    assert_eq!(cfg.backend, Backend::Memory);
    assert_eq!(cfg.port, 8080);
    assert!(!cfg.seed_demo_data);
  }

  #[tokio::test]
  async fn api_is_nested_under_prefix() {
    let clock = Arc::new(FixedClock::at_date(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()));
    let store = Arc::new(MemoryStore::with_clock(clock.clone()));
    let app = app(store, clock);

    let ok = app
      .clone()
      .oneshot(Request::get("/api/calendar").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(ok.status(), StatusCode::OK);

    let missing = app
      .oneshot(Request::get("/calendar").body(Body::empty()).unwrap())
      .await
      .unwrap();
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
  }
}
