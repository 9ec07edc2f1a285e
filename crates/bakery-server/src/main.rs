//! bakery-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! configured order store, and serves the JSON API under `/api`.
//!
//! Every key can also be set through the environment, e.g.
//! `BAKERY_BACKEND=memory BAKERY_PORT=3000`.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use bakery_core::{
  clock::{Clock, SystemClock},
  store::OrderStore,
};
use bakery_server::{Backend, ServerConfig, seed};
use bakery_store_memory::MemoryStore;
use bakery_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Bakery order book server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Populate an empty store with demo customers and orders.
  #[arg(long)]
  seed: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Load configuration.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(config::Environment::with_prefix("BAKERY"))
    .build()
    .context("failed to read config file")?;

  let mut server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  server_cfg.seed_demo_data |= cli.seed;

  let clock: Arc<dyn Clock> = Arc::new(SystemClock);

  match server_cfg.backend {
    Backend::Memory => {
      tracing::warn!("using the in-memory backend; orders are lost on exit");
      let store = MemoryStore::with_clock(clock.clone());
      serve(store, clock, &server_cfg).await
    }
    Backend::Sqlite => {
      // Expand `~` in store path.
      let store_path = expand_tilde(&server_cfg.store_path);
      if let Some(parent) = store_path.parent()
        && !parent.as_os_str().is_empty()
      {
        std::fs::create_dir_all(parent)
          .with_context(|| format!("failed to create {parent:?}"))?;
      }

      let store = SqliteStore::open_with_clock(&store_path, clock.clone())
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      serve(store, clock, &server_cfg).await
    }
  }
}

async fn serve<S>(store: S, clock: Arc<dyn Clock>, cfg: &ServerConfig) -> anyhow::Result<()>
where
  S: OrderStore + 'static,
{
  if cfg.seed_demo_data {
    let seeded = seed::demo_data(&store, clock.today())
      .await
      .context("failed to seed demo data")?;
    if !seeded {
      tracing::info!("store already has customers; skipping demo data");
    }
  }

  let app = bakery_server::app(Arc::new(store), clock);
  let address = format!("{}:{}", cfg.host, cfg.port);

  tracing::info!("Listening on http://{address}/api");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
