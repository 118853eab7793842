//! Region list parser.
//!
//! The list service answers every level of the hierarchy with the same shape:
//!
//! ```text
//! 01|北京,02|上海,03|天津
//! ```
//!
//! Items are separated by `,`; each item is `code|name` with exactly one
//! `|`. Any other item shape fails the whole response, so a bad response
//! never leaves a partial import behind.

use coolweather_core::{
  region::{CityId, NewCity, NewCounty, NewProvince, ProvinceId},
  store::WeatherStore,
};

use crate::error::{Error, Result};

// ─── Splitting ───────────────────────────────────────────────────────────────

/// Split a list response into `(code, name)` pairs.
///
/// Returns `None` for a response that is empty once whitespace and trailing
/// `,` separators are dropped. Empty items before the last real one are
/// malformed.
fn split_items(response: &str) -> Result<Option<Vec<(&str, &str)>>> {
  let response = response.trim().trim_end_matches(',');
  if response.is_empty() {
    return Ok(None);
  }

  response
    .split(',')
    .enumerate()
    .map(|(index, item)| split_pair(index, item))
    .collect::<Result<Vec<_>>>()
    .map(Some)
}

fn split_pair(index: usize, item: &str) -> Result<(&str, &str)> {
  match item.split_once('|') {
    Some((code, name)) if !name.contains('|') => Ok((code, name)),
    _ => Err(Error::MalformedItem { index, item: item.to_owned() }),
  }
}

// ─── Pure parsers ────────────────────────────────────────────────────────────

pub fn parse_provinces(response: &str) -> Result<Option<Vec<NewProvince>>> {
  Ok(split_items(response)?.map(|items| {
    items
      .into_iter()
      .map(|(code, name)| NewProvince::new(code, name))
      .collect()
  }))
}

/// Every parsed city is attached to `province_id`.
pub fn parse_cities(response: &str, province_id: ProvinceId) -> Result<Option<Vec<NewCity>>> {
  Ok(split_items(response)?.map(|items| {
    items
      .into_iter()
      .map(|(code, name)| NewCity::new(province_id, code, name))
      .collect()
  }))
}

/// Every parsed county is attached to `city_id`.
pub fn parse_counties(response: &str, city_id: CityId) -> Result<Option<Vec<NewCounty>>> {
  Ok(split_items(response)?.map(|items| {
    items
      .into_iter()
      .map(|(code, name)| NewCounty::new(city_id, code, name))
      .collect()
  }))
}

/// Parse a county's weather-code lookup, `county_code|weather_code`, and
/// return the weather code.
pub fn parse_weather_code(response: &str) -> Result<Option<String>> {
  let response = response.trim();
  if response.is_empty() {
    return Ok(None);
  }
  let (_, weather_code) = split_pair(0, response)?;
  Ok(Some(weather_code.to_owned()))
}

// ─── Storing handlers ────────────────────────────────────────────────────────

/// Parse a province list and save every item.
///
/// Returns `false` without touching the store when `response` is blank.
/// Items are saved as individual rows under the store's write lock, so
/// concurrent handlers never interleave their rows.
pub async fn handle_provinces_response<S: WeatherStore>(
  store: &S,
  response: &str,
) -> Result<bool> {
  let Some(provinces) = parse_provinces(response)? else {
    return Ok(false);
  };
  let saved = store.save_provinces(provinces).await.map_err(Error::store)?;
  tracing::info!(count = saved.len(), "stored provinces");
  Ok(true)
}

pub async fn handle_cities_response<S: WeatherStore>(
  store: &S,
  response: &str,
  province_id: ProvinceId,
) -> Result<bool> {
  let Some(cities) = parse_cities(response, province_id)? else {
    return Ok(false);
  };
  let saved = store.save_cities(cities).await.map_err(Error::store)?;
  tracing::info!(%province_id, count = saved.len(), "stored cities");
  Ok(true)
}

pub async fn handle_counties_response<S: WeatherStore>(
  store: &S,
  response: &str,
  city_id: CityId,
) -> Result<bool> {
  let Some(counties) = parse_counties(response, city_id)? else {
    return Ok(false);
  };
  let saved = store.save_counties(counties).await.map_err(Error::store)?;
  tracing::info!(%city_id, count = saved.len(), "stored counties");
  Ok(true)
}
