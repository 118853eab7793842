//! `coolweather`: keeps a local region hierarchy and a cached weather
//! snapshot for one selected location.
//!
//! # Usage
//!
//! ```text
//! coolweather import                 # fetch provinces, cities and counties
//! coolweather provinces
//! coolweather cities 19
//! coolweather select 190404          # pick a county by its code
//! coolweather refresh                # fetch weather once
//! coolweather run                    # refresh every 8 hours until Ctrl-C
//! ```

mod config;

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use coolweather_core::{
  region::{CityId, ProvinceId},
  store::WeatherStore,
  weather::WeatherSnapshot,
};
use coolweather_store_sqlite::SqliteStore;
use coolweather_sync::{
  HierarchyImporter, HttpFetcher, RefreshScheduler, SyncConfig, WeatherRefresher,
};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(author, version, about = "Region list and weather cache")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "coolweather.toml")]
  config: PathBuf,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand)]
enum Command {
  /// Fetch the region hierarchy, top-down, skipping levels already stored.
  Import {
    /// How deep to walk.
    #[arg(long, value_enum, default_value_t = Depth::Counties)]
    depth: Depth,
  },
  /// List stored provinces.
  Provinces,
  /// List stored cities of a province.
  Cities { province_id: i64 },
  /// List stored counties of a city.
  Counties { city_id: i64 },
  /// Select the location to refresh, by county code.
  Select { county_code: String },
  /// Refresh the weather snapshot once.
  Refresh,
  /// Print the cached weather snapshot.
  Show,
  /// Refresh on a fixed interval until interrupted.
  Run,
}

#[derive(Clone, Copy, ValueEnum)]
enum Depth {
  Provinces,
  Cities,
  Counties,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = AppConfig::load(&cli.config)?;

  if let Some(parent) = cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create {}", parent.display()))?;
  }
  let store = SqliteStore::open(&cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", cfg.store_path))?;
  let store = Arc::new(store);
  let sync = Arc::new(cfg.sync);

  match cli.command {
    Command::Import { depth } => import(store, sync, depth).await,
    Command::Provinces => {
      for p in store.load_provinces().await? {
        println!("{:>5}  {:<8} {}", p.id, p.code, p.name);
      }
      Ok(())
    }
    Command::Cities { province_id } => {
      for c in store.load_cities(ProvinceId(province_id)).await? {
        println!("{:>5}  {:<8} {}", c.id, c.code, c.name);
      }
      Ok(())
    }
    Command::Counties { city_id } => {
      for c in store.load_counties(CityId(city_id)).await? {
        println!("{:>5}  {:<8} {}", c.id, c.code, c.name);
      }
      Ok(())
    }
    Command::Select { county_code } => {
      let importer = HierarchyImporter::new(store, fetcher(&sync)?, sync);
      let weather_code = importer
        .select_county(&county_code)
        .await
        .with_context(|| format!("failed to select county {county_code}"))?;
      println!("selected {county_code} (weather code {weather_code})");
      Ok(())
    }
    Command::Refresh => {
      let refresher = WeatherRefresher::new(store, fetcher(&sync)?, sync);
      let snapshot = refresher.refresh_now().await.context("refresh failed")?;
      print_snapshot(&snapshot);
      Ok(())
    }
    Command::Show => {
      match store.load_snapshot().await? {
        Some(snapshot) => print_snapshot(&snapshot),
        None => println!("no weather cached yet"),
      }
      Ok(())
    }
    Command::Run => run(store, sync).await,
  }
}

fn fetcher(sync: &SyncConfig) -> anyhow::Result<HttpFetcher> {
  HttpFetcher::new(sync).context("failed to build HTTP client")
}

async fn import(
  store: Arc<SqliteStore>,
  sync: Arc<SyncConfig>,
  depth: Depth,
) -> anyhow::Result<()> {
  let importer = HierarchyImporter::new(store, fetcher(&sync)?, sync);

  match depth {
    Depth::Provinces => {
      let provinces = importer.import_provinces().await?;
      println!("{} provinces", provinces.len());
    }
    Depth::Cities => {
      let provinces = importer.import_provinces().await?;
      let mut cities = 0;
      for province in &provinces {
        match importer.import_cities(province).await {
          Ok(c) => cities += c.len(),
          Err(e) => tracing::warn!(province = %province.name, error = %e, "skipping province"),
        }
      }
      println!("{} provinces, {cities} cities", provinces.len());
    }
    Depth::Counties => {
      let summary = importer.import_all().await?;
      println!(
        "{} provinces, {} cities, {} counties ({} failed branches)",
        summary.provinces, summary.cities, summary.counties, summary.failures
      );
    }
  }
  Ok(())
}

async fn run(store: Arc<SqliteStore>, sync: Arc<SyncConfig>) -> anyhow::Result<()> {
  let interval = sync.refresh_interval();
  let refresher = WeatherRefresher::new(store, fetcher(&sync)?, sync);
  let handle = RefreshScheduler::new(Arc::new(refresher), interval).start();

  tokio::signal::ctrl_c()
    .await
    .context("failed to listen for Ctrl-C")?;
  tracing::info!("interrupted; stopping scheduler");
  handle.stop().await?;
  Ok(())
}

fn print_snapshot(s: &WeatherSnapshot) {
  println!("{} ({})", s.city_name, s.weather_code);
  println!("{}  {} ~ {}", s.description, s.temp_low, s.temp_high);
  println!(
    "published {}, fetched {}",
    s.publish_time,
    coolweather_core::settings::format_date(s.fetched_date)
  );
}
