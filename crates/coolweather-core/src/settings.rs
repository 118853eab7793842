//! The key-value settings area and how a [`WeatherSnapshot`] is laid out in
//! it.
//!
//! Every value is stored as text. Booleans are `"true"` / `"false"`, and the
//! fetch date uses the `2016年12月9日` form (no zero padding).

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::{Error, Result, weather::WeatherSnapshot};

pub const CITY_SELECTED: &str = "city_selected";
pub const CITY_NAME: &str = "city_name";
pub const WEATHER_CODE: &str = "weather_code";
pub const TEMP1: &str = "temp1";
pub const TEMP2: &str = "temp2";
pub const WEATHER_DESP: &str = "weather_desp";
pub const PUBLISH_TIME: &str = "publish_time";
pub const CURRENT_DATE: &str = "current_date";

/// Every key written by [`snapshot_entries`].
pub const SNAPSHOT_KEYS: [&str; 8] = [
  CITY_SELECTED,
  CITY_NAME,
  WEATHER_CODE,
  TEMP1,
  TEMP2,
  WEATHER_DESP,
  PUBLISH_TIME,
  CURRENT_DATE,
];

const DATE_FORMAT: &str = "%Y年%-m月%-d日";
const DATE_PARSE_FORMAT: &str = "%Y年%m月%d日";

// ─── Dates ───────────────────────────────────────────────────────────────────

pub fn format_date(date: NaiveDate) -> String { date.format(DATE_FORMAT).to_string() }

pub fn parse_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_PARSE_FORMAT).map_err(|_| Error::InvalidDate {
    key:   CURRENT_DATE,
    value: s.to_owned(),
  })
}

// ─── Booleans ────────────────────────────────────────────────────────────────

pub fn encode_bool(b: bool) -> &'static str { if b { "true" } else { "false" } }

pub fn decode_bool(key: &'static str, s: &str) -> Result<bool> {
  match s {
    "true" => Ok(true),
    "false" => Ok(false),
    other => Err(Error::InvalidSetting { key, value: other.to_owned() }),
  }
}

// ─── Snapshot layout ─────────────────────────────────────────────────────────

/// The full set of settings rows that represent `snapshot`. Writing all of
/// them replaces any earlier snapshot completely.
pub fn snapshot_entries(snapshot: &WeatherSnapshot) -> Vec<(&'static str, String)> {
  vec![
    (CITY_SELECTED, encode_bool(true).to_owned()),
    (CITY_NAME, snapshot.city_name.clone()),
    (WEATHER_CODE, snapshot.weather_code.clone()),
    (TEMP1, snapshot.temp_high.clone()),
    (TEMP2, snapshot.temp_low.clone()),
    (WEATHER_DESP, snapshot.description.clone()),
    (PUBLISH_TIME, snapshot.publish_time.clone()),
    (CURRENT_DATE, format_date(snapshot.fetched_date)),
  ]
}

/// Rebuild a snapshot from settings rows.
///
/// Returns `None` when no city has been selected yet or when any snapshot key
/// is missing (e.g. only `weather_code` was set by a location pick).
pub fn snapshot_from_entries(
  entries: &HashMap<String, String>,
) -> Result<Option<WeatherSnapshot>> {
  let selected = match entries.get(CITY_SELECTED) {
    Some(v) => decode_bool(CITY_SELECTED, v)?,
    None => false,
  };
  if !selected {
    return Ok(None);
  }

  let field = |key: &str| entries.get(key).cloned();
  let (
    Some(city_name),
    Some(weather_code),
    Some(temp_high),
    Some(temp_low),
    Some(description),
    Some(publish_time),
    Some(date),
  ) = (
    field(CITY_NAME),
    field(WEATHER_CODE),
    field(TEMP1),
    field(TEMP2),
    field(WEATHER_DESP),
    field(PUBLISH_TIME),
    field(CURRENT_DATE),
  )
  else {
    return Ok(None);
  };

  Ok(Some(WeatherSnapshot {
    city_name,
    weather_code,
    temp_high,
    temp_low,
    description,
    publish_time,
    fetched_date: parse_date(&date)?,
  }))
}
