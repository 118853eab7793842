//! Error types for `coolweather-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("invalid date in setting {key}: {value:?}")]
  InvalidDate { key: &'static str, value: String },

  #[error("invalid value for setting {key}: {value:?}")]
  InvalidSetting { key: &'static str, value: String },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
