//! Error types for `coolweather-sync`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Connect or read timeout, refused connection, broken stream, bad URL.
  #[error("http error: {0}")]
  Http(#[from] reqwest::Error),

  #[error("protocol error: {0}")]
  Protocol(#[from] coolweather_protocol::Error),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  /// The `weather_code` setting is missing or empty.
  #[error("no location selected")]
  NoLocationSelected,

  #[error("empty weather code lookup for county {0}")]
  EmptyLookup(String),

  #[error("background task failed: {0}")]
  Join(#[from] tokio::task::JoinError),
}

impl Error {
  pub(crate) fn store(e: impl std::error::Error + Send + Sync + 'static) -> Self {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
