//! tripwatch server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! store, runs an update cycle on start-up and then every poll interval, and
//! serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tripwatch_server::{ServerConfig, scheduler};
use tripwatch_store_sqlite::SqliteStore;
use tripwatch_sync::{HttpPageSource, TelegramNotifier, UpdateCycle};

#[derive(Parser)]
#[command(author, version, about = "Trip calendar tracker")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// Run a single update cycle and exit.
  #[arg(long)]
  once: bool,
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

  let cfg = ServerConfig::load(&cli.config).context("failed to load configuration")?;

  if let Some(parent) = cfg.store_path.parent().filter(|p| !p.as_os_str().is_empty()) {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let store = Arc::new(store);

  let notifier = TelegramNotifier::new(
    &cfg.telegram.api_base,
    &cfg.telegram.bot_token,
    cfg.fetch_timeout(),
  )
  .context("failed to build chat notifier")?;
  let source = HttpPageSource::new(cfg.page_url.clone(), cfg.fetch_timeout())
    .context("failed to build page fetcher")?;
  let cycle = Arc::new(UpdateCycle::new(store.clone(), Arc::new(notifier), source));

  if cli.once {
    let report = cycle.run().await.context("update cycle failed")?;
    println!("{}", serde_json::to_string_pretty(&report)?);
    return Ok(());
  }

  tracing::info!(
    url = %cfg.page_url,
    every_secs = cfg.poll_interval().as_secs(),
    "scheduling calendar checks"
  );
  let poller = tokio::spawn(scheduler::run_periodically(cycle.clone(), cfg.poll_interval()));

  let app = tripwatch_server::router(store, cycle);
  let address = cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  poller.abort();
  tracing::info!("shut down");
  Ok(())
}

async fn shutdown_signal() {
  if let Err(error) = tokio::signal::ctrl_c().await {
    tracing::error!(%error, "failed to listen for Ctrl-C");
    std::future::pending::<()>().await;
  }
}
