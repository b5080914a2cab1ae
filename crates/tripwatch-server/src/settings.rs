//! Runtime configuration.
//!
//! Layered, lowest precedence first: built-in defaults, the optional TOML
//! file, then `TRIPWATCH_*` environment variables with `__` between nested
//! keys (e.g. `TRIPWATCH_TELEGRAM__BOT_TOKEN`).

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use config::{Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState};
use serde::Deserialize;

pub const DEFAULT_PAGE_URL: &str = "https://vk.com/@-60394841-kalendar-vyezdov-2025";

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:               String,
  pub port:               u16,
  pub store_path:         PathBuf,
  pub page_url:           String,
  pub poll_interval_secs: u64,
  pub fetch_timeout_secs: u64,
  pub telegram:           TelegramConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
  pub bot_token: String,
  pub api_base:  String,
}

impl ServerConfig {
  /// Load from `path` (which may be absent) and the environment.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    Self::from_builder(
      defaults()?
        .add_source(File::from(path).required(false))
        .add_source(
          Environment::with_prefix("TRIPWATCH")
            .prefix_separator("_")
            .separator("__"),
        ),
    )
  }

  fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
    let mut cfg: Self = builder.build()?.try_deserialize()?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }

  pub fn poll_interval(&self) -> Duration { Duration::from_secs(self.poll_interval_secs.max(1)) }

  pub fn fetch_timeout(&self) -> Duration { Duration::from_secs(self.fetch_timeout_secs.max(1)) }

  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
  Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store_path", "~/.local/share/tripwatch/tripwatch.db")?
    .set_default("page_url", DEFAULT_PAGE_URL)?
    .set_default("poll_interval_secs", 3600)?
    .set_default("fetch_timeout_secs", 30)?
    .set_default("telegram.api_base", tripwatch_sync::telegram::DEFAULT_API_BASE)
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
