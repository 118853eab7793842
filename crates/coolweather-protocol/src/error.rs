//! Error types for the CoolWeather wire-format parsers.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A list item that is not exactly `code|name`.
  #[error("malformed list item #{index}: {item:?}")]
  MalformedItem { index: usize, item: String },

  #[error("weather payload error: {0}")]
  Weather(#[from] serde_json::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
