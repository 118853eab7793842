//! Top-down import of the region hierarchy from the list service.
//!
//! Each level is fetched only once its parent row is stored, and only when
//! the store has nothing for that parent yet. Re-running an import is
//! therefore cheap and does not duplicate rows.

use std::sync::Arc;

use coolweather_core::{
  region::{City, County, Province},
  settings::WEATHER_CODE,
  store::WeatherStore,
};
use coolweather_protocol::{
  handle_cities_response, handle_counties_response, handle_provinces_response,
  parse_weather_code,
};

use crate::{Result, config::SyncConfig, error::Error, fetch::HttpFetcher};

/// Row counts after an [`HierarchyImporter::import_all`] walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
  pub provinces: usize,
  pub cities:    usize,
  pub counties:  usize,
  /// Branches that failed and were skipped.
  pub failures:  usize,
}

pub struct HierarchyImporter<S> {
  store:   Arc<S>,
  fetcher: HttpFetcher,
  config:  Arc<SyncConfig>,
}

impl<S: WeatherStore> HierarchyImporter<S> {
  pub fn new(store: Arc<S>, fetcher: HttpFetcher, config: Arc<SyncConfig>) -> Self {
    Self { store, fetcher, config }
  }

  /// Stored provinces, fetching the list first if there are none.
  pub async fn import_provinces(&self) -> Result<Vec<Province>> {
    let stored = self.store.load_provinces().await.map_err(Error::store)?;
    if !stored.is_empty() {
      return Ok(stored);
    }

    let body = self.fetcher.fetch(&self.config.province_list_url).await?;
    handle_provinces_response(self.store.as_ref(), &body).await?;
    self.store.load_provinces().await.map_err(Error::store)
  }

  /// Stored cities of `province`, fetching them first if there are none.
  pub async fn import_cities(&self, province: &Province) -> Result<Vec<City>> {
    let stored = self.store.load_cities(province.id).await.map_err(Error::store)?;
    if !stored.is_empty() {
      return Ok(stored);
    }

    let body = self.fetcher.fetch(&self.config.child_list_url(&province.code)).await?;
    handle_cities_response(self.store.as_ref(), &body, province.id).await?;
    self.store.load_cities(province.id).await.map_err(Error::store)
  }

  /// Stored counties of `city`, fetching them first if there are none.
  pub async fn import_counties(&self, city: &City) -> Result<Vec<County>> {
    let stored = self.store.load_counties(city.id).await.map_err(Error::store)?;
    if !stored.is_empty() {
      return Ok(stored);
    }

    let body = self.fetcher.fetch(&self.config.child_list_url(&city.code)).await?;
    handle_counties_response(self.store.as_ref(), &body, city.id).await?;
    self.store.load_counties(city.id).await.map_err(Error::store)
  }

  /// Walk the whole hierarchy. A province or city whose children cannot be
  /// fetched or parsed is logged and skipped; the walk carries on.
  pub async fn import_all(&self) -> Result<ImportSummary> {
    let mut summary = ImportSummary::default();
    let provinces = self.import_provinces().await?;
    summary.provinces = provinces.len();

    for province in &provinces {
      let cities = match self.import_cities(province).await {
        Ok(cities) => cities,
        Err(e) => {
          tracing::warn!(province = %province.name, error = %e, "skipping province");
          summary.failures += 1;
          continue;
        }
      };
      summary.cities += cities.len();

      for city in &cities {
        match self.import_counties(city).await {
          Ok(counties) => summary.counties += counties.len(),
          Err(e) => {
            tracing::warn!(city = %city.name, error = %e, "skipping city");
            summary.failures += 1;
          }
        }
      }
    }

    tracing::info!(
      provinces = summary.provinces,
      cities = summary.cities,
      counties = summary.counties,
      failures = summary.failures,
      "hierarchy import finished"
    );
    Ok(summary)
  }

  /// Look up the weather code for `county_code` and make it the selected
  /// location for the next refresh.
  pub async fn select_county(&self, county_code: &str) -> Result<String> {
    let body = self.fetcher.fetch(&self.config.child_list_url(county_code)).await?;
    let weather_code =
      parse_weather_code(&body)?.ok_or_else(|| Error::EmptyLookup(county_code.to_owned()))?;

    self
      .store
      .put_setting(WEATHER_CODE, &weather_code)
      .await
      .map_err(Error::store)?;
    tracing::info!(county_code, %weather_code, "location selected");
    Ok(weather_code)
  }
}
