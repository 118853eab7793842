//! Endpoint templates, timeouts and the refresh interval.

use std::time::Duration;

use serde::Deserialize;

/// Placeholder substituted in every URL template.
pub const CODE_PLACEHOLDER: &str = "{code}";

/// Runtime settings for fetching and refreshing, deserialised from the
/// `[sync]` table of the config file. Every field has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
  /// Weather payload endpoint; `{code}` is the selected weather code.
  pub weather_url:           String,
  /// Province list endpoint.
  pub province_list_url:     String,
  /// Child list endpoint; `{code}` is the parent's code. Also answers the
  /// county → weather code lookup.
  pub child_list_url:        String,
  pub refresh_interval_secs: u64,
  pub connect_timeout_ms:    u64,
  pub read_timeout_ms:       u64,
  /// Bodies longer than this are truncated.
  pub max_body_bytes:        usize,
}

impl Default for SyncConfig {
  fn default() -> Self {
    Self {
      weather_url:           "http://www.weather.com.cn/data/cityinfo/{code}.html".into(),
      province_list_url:     "http://www.weather.com.cn/data/list3/city.xml".into(),
      child_list_url:        "http://www.weather.com.cn/data/list3/city{code}.xml".into(),
      refresh_interval_secs: 8 * 60 * 60,
      connect_timeout_ms:    5000,
      read_timeout_ms:       5000,
      max_body_bytes:        1024,
    }
  }
}

impl SyncConfig {
  pub fn weather_url(&self, weather_code: &str) -> String {
    self.weather_url.replace(CODE_PLACEHOLDER, weather_code)
  }

  pub fn child_list_url(&self, parent_code: &str) -> String {
    self.child_list_url.replace(CODE_PLACEHOLDER, parent_code)
  }

  pub fn refresh_interval(&self) -> Duration { Duration::from_secs(self.refresh_interval_secs) }

  pub fn connect_timeout(&self) -> Duration { Duration::from_millis(self.connect_timeout_ms) }

  pub fn read_timeout(&self) -> Duration { Duration::from_millis(self.read_timeout_ms) }
}
