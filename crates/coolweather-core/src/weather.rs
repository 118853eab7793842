//! The cached weather snapshot for the selected location.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The single cached weather result for the currently selected location.
///
/// Replaced wholesale on every successful refresh; fields from an older
/// snapshot are never carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
  pub city_name:    String,
  pub weather_code: String,
  /// `temp1` in the upstream payload.
  pub temp_high:    String,
  /// `temp2` in the upstream payload.
  pub temp_low:     String,
  pub description:  String,
  /// Upstream publish time, e.g. `"11:00"`.
  pub publish_time: String,
  /// Local date on which the snapshot was fetched.
  pub fetched_date: NaiveDate,
}
