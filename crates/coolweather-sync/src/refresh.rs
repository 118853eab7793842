//! The fetch → extract → store cycle for the selected location.

use std::{future::Future, sync::Arc};

use chrono::Local;
use coolweather_core::{settings::WEATHER_CODE, store::WeatherStore, weather::WeatherSnapshot};
use coolweather_protocol::handle_weather_response;

use crate::{Result, config::SyncConfig, error::Error, fetch::HttpFetcher};

/// One unit of work launched by the scheduler on every fire.
pub trait RefreshTask: Send + Sync + 'static {
  fn refresh(&self) -> impl Future<Output = Result<()>> + Send;
}

/// Refreshes the cached weather snapshot for the location whose code is in
/// the `weather_code` setting.
pub struct WeatherRefresher<S> {
  store:   Arc<S>,
  fetcher: HttpFetcher,
  config:  Arc<SyncConfig>,
}

impl<S: WeatherStore + 'static> WeatherRefresher<S> {
  pub fn new(store: Arc<S>, fetcher: HttpFetcher, config: Arc<SyncConfig>) -> Self {
    Self { store, fetcher, config }
  }

  /// Run one cycle and return the snapshot that was saved.
  ///
  /// Fails without fetching when no location has been selected. A failed
  /// fetch or extraction leaves the previous snapshot untouched.
  pub async fn refresh_now(&self) -> Result<WeatherSnapshot> {
    let code = self
      .store
      .get_setting(WEATHER_CODE)
      .await
      .map_err(Error::store)?
      .filter(|code| !code.trim().is_empty())
      .ok_or(Error::NoLocationSelected)?;

    let url = self.config.weather_url(code.trim());
    let body = self.fetcher.fetch(&url).await?;
    let today = Local::now().date_naive();
    let snapshot = handle_weather_response(self.store.as_ref(), &body, today).await?;
    Ok(snapshot)
  }
}

impl<S: WeatherStore + 'static> RefreshTask for WeatherRefresher<S> {
  async fn refresh(&self) -> Result<()> {
    self.refresh_now().await.map(|_| ())
  }
}
