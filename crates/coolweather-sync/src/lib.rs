//! Network side of CoolWeather: fetching, the periodic refresh cycle and the
//! region hierarchy import.
//!
//! Everything here is generic over [`coolweather_core::store::WeatherStore`];
//! the caller owns the store and hands an `Arc` of it to each component.

pub mod config;
pub mod error;
pub mod fetch;
pub mod import;
pub mod refresh;
pub mod scheduler;

pub use config::SyncConfig;
pub use error::{Error, Result};
pub use fetch::{FetchListener, HttpFetcher};
pub use import::{HierarchyImporter, ImportSummary};
pub use refresh::{RefreshTask, WeatherRefresher};
pub use scheduler::{Fire, RefreshScheduler, SchedulerHandle};
