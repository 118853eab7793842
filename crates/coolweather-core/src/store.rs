//! The `WeatherStore` trait.
//!
//! Implemented by storage backends (e.g. `coolweather-store-sqlite`). The
//! parsers, the refresh cycle and the CLI depend on this abstraction, not on
//! any concrete backend.

use std::future::Future;

use crate::{
  region::{City, CityId, County, NewCity, NewCounty, NewProvince, Province, ProvinceId},
  weather::WeatherSnapshot,
};

/// Abstraction over a CoolWeather store backend.
///
/// Hierarchy rows are append-only: there is no update or delete. Saves never
/// check for an existing code or for the existence of the parent row.
///
/// All writes (single saves, batch saves and settings writes) are serialised
/// by a lock owned by the store. Reads do not take that lock and may observe
/// a partially imported hierarchy.
pub trait WeatherStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Provinces ─────────────────────────────────────────────────────────

  /// Insert one province and return it with its store-assigned id.
  fn save_province(
    &self,
    province: NewProvince,
  ) -> impl Future<Output = Result<Province, Self::Error>> + Send + '_;

  /// Insert each province as its own row, holding the write lock for the
  /// whole batch. There is no enclosing transaction.
  fn save_provinces(
    &self,
    provinces: Vec<NewProvince>,
  ) -> impl Future<Output = Result<Vec<Province>, Self::Error>> + Send + '_;

  /// All provinces in insertion order.
  fn load_provinces(
    &self,
  ) -> impl Future<Output = Result<Vec<Province>, Self::Error>> + Send + '_;

  // ── Cities ────────────────────────────────────────────────────────────

  fn save_city(
    &self,
    city: NewCity,
  ) -> impl Future<Output = Result<City, Self::Error>> + Send + '_;

  fn save_cities(
    &self,
    cities: Vec<NewCity>,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + '_;

  /// Cities whose `province_id` is exactly `province_id`.
  fn load_cities(
    &self,
    province_id: ProvinceId,
  ) -> impl Future<Output = Result<Vec<City>, Self::Error>> + Send + '_;

  // ── Counties ──────────────────────────────────────────────────────────

  fn save_county(
    &self,
    county: NewCounty,
  ) -> impl Future<Output = Result<County, Self::Error>> + Send + '_;

  fn save_counties(
    &self,
    counties: Vec<NewCounty>,
  ) -> impl Future<Output = Result<Vec<County>, Self::Error>> + Send + '_;

  /// Counties whose `city_id` is exactly `city_id`.
  fn load_counties(
    &self,
    city_id: CityId,
  ) -> impl Future<Output = Result<Vec<County>, Self::Error>> + Send + '_;

  // ── Settings ──────────────────────────────────────────────────────────

  fn get_setting<'a>(
    &'a self,
    key: &'a str,
  ) -> impl Future<Output = Result<Option<String>, Self::Error>> + Send + 'a;

  fn put_setting<'a>(
    &'a self,
    key: &'a str,
    value: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Replace the cached snapshot. All snapshot keys are written atomically.
  fn save_snapshot<'a>(
    &'a self,
    snapshot: &'a WeatherSnapshot,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// The cached snapshot, or `None` if no refresh has succeeded yet.
  fn load_snapshot(
    &self,
  ) -> impl Future<Output = Result<Option<WeatherSnapshot>, Self::Error>> + Send + '_;
}
