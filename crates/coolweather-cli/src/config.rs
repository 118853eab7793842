//! Layered configuration: optional TOML file, then `COOLWEATHER__*`
//! environment variables.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use coolweather_sync::SyncConfig;
use serde::Deserialize;

/// Shape of `coolweather.toml`.
///
/// ```toml
/// store_path = "~/.local/share/coolweather/cool_weather.db"
///
/// [sync]
/// refresh_interval_secs = 28800
/// max_body_bytes = 1024
/// ```
#[derive(Debug, Deserialize)]
pub struct AppConfig {
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub sync:       SyncConfig,
}

fn default_store_path() -> PathBuf { PathBuf::from("cool_weather.db") }

impl AppConfig {
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("COOLWEATHER").separator("__"))
      .build()
      .context("failed to read config file")?;

    let mut cfg: AppConfig = settings
      .try_deserialize()
      .context("failed to deserialise AppConfig")?;
    cfg.store_path = expand_tilde(&cfg.store_path);
    Ok(cfg)
  }
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
