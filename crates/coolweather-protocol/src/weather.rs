//! `weatherinfo` JSON payload parser.
//!
//! ```json
//! {"weatherinfo":
//!   {"city":"昆山","cityid":"101190404","temp1":"21℃","temp2":"9℃",
//!    "weather":"多云转小雨","img1":"d1.gif","img2":"n7.gif","ptime":"11:00"}}
//! ```
//!
//! Fields not listed on [`WeatherReport`] are ignored.

use chrono::NaiveDate;
use coolweather_core::{store::WeatherStore, weather::WeatherSnapshot};
use serde::Deserialize;

use crate::error::{Error, Result};

#[derive(Deserialize)]
struct Envelope {
  weatherinfo: WeatherReport,
}

/// The six fields extracted from a `weatherinfo` payload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WeatherReport {
  #[serde(rename = "city")]
  pub city_name:    String,
  #[serde(rename = "cityid")]
  pub weather_code: String,
  pub temp1:        String,
  pub temp2:        String,
  #[serde(rename = "weather")]
  pub description:  String,
  #[serde(rename = "ptime")]
  pub publish_time: String,
}

impl WeatherReport {
  pub fn into_snapshot(self, fetched_date: NaiveDate) -> WeatherSnapshot {
    WeatherSnapshot {
      city_name: self.city_name,
      weather_code: self.weather_code,
      temp_high: self.temp1,
      temp_low: self.temp2,
      description: self.description,
      publish_time: self.publish_time,
      fetched_date,
    }
  }
}

/// Extract the report. Invalid JSON, a missing `weatherinfo` object, or a
/// missing or non-string field are all [`Error::Weather`].
pub fn parse_weather(response: &str) -> Result<WeatherReport> {
  let envelope: Envelope = serde_json::from_str(response)?;
  Ok(envelope.weatherinfo)
}

/// Extract the report and save it as the current snapshot, dated
/// `fetched_date`.
///
/// On an extraction failure nothing is written and the previous snapshot
/// stays in place.
pub async fn handle_weather_response<S: WeatherStore>(
  store: &S,
  response: &str,
  fetched_date: NaiveDate,
) -> Result<WeatherSnapshot> {
  let report = match parse_weather(response) {
    Ok(report) => report,
    Err(e) => {
      tracing::warn!(error = %e, "discarding weather payload");
      return Err(e);
    }
  };

  let snapshot = report.into_snapshot(fetched_date);
  store.save_snapshot(&snapshot).await.map_err(Error::store)?;
  Ok(snapshot)
}
