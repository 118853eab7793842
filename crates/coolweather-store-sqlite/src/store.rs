//! [`SqliteStore`]: the SQLite implementation of [`WeatherStore`].

use std::{collections::HashMap, path::Path, sync::Arc};

use rusqlite::{OptionalExtension as _, Statement};
use tokio::sync::Mutex;

use coolweather_core::{
  region::{
    City, CityId, County, CountyId, NewCity, NewCounty, NewProvince, Province, ProvinceId,
  },
  settings::{SNAPSHOT_KEYS, snapshot_entries, snapshot_from_entries},
  store::WeatherStore,
  weather::WeatherSnapshot,
};

use crate::{
  Result,
  rows::{
    CITY_COLUMNS, COUNTY_COLUMNS, PROVINCE_COLUMNS, city_from_row, county_from_row,
    province_from_row,
  },
  schema::SCHEMA,
};

const INSERT_PROVINCE: &str =
  "INSERT INTO province (province_name, province_code) VALUES (?1, ?2)";
const INSERT_CITY: &str =
  "INSERT INTO city (city_name, city_code, province_id) VALUES (?1, ?2, ?3)";
const INSERT_COUNTY: &str =
  "INSERT INTO county (county_name, county_code, city_id) VALUES (?1, ?2, ?3)";
const UPSERT_SETTING: &str = "INSERT INTO settings (key, value) VALUES (?1, ?2)
   ON CONFLICT(key) DO UPDATE SET value = excluded.value";

// ─── Row inserts ─────────────────────────────────────────────────────────────

fn insert_province(stmt: &mut Statement<'_>, p: NewProvince) -> rusqlite::Result<Province> {
  let id = stmt.insert(rusqlite::params![p.name, p.code])?;
  Ok(p.into_province(ProvinceId(id)))
}

fn insert_city(stmt: &mut Statement<'_>, c: NewCity) -> rusqlite::Result<City> {
  let id = stmt.insert(rusqlite::params![c.name, c.code, c.province_id.0])?;
  Ok(c.into_city(CityId(id)))
}

fn insert_county(stmt: &mut Statement<'_>, c: NewCounty) -> rusqlite::Result<County> {
  let id = stmt.insert(rusqlite::params![c.name, c.code, c.city_id.0])?;
  Ok(c.into_county(CountyId(id)))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A CoolWeather store backed by a single SQLite file.
///
/// Cloning is cheap; the connection and the write lock are shared between
/// clones.
#[derive(Clone)]
pub struct SqliteStore {
  conn:   tokio_rusqlite::Connection,
  writes: Arc<Mutex<()>>,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    Self::init(conn).await
  }

  /// Open an in-memory store, mostly for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    Self::init(conn).await
  }

  async fn init(conn: tokio_rusqlite::Connection) -> Result<Self> {
    conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema ready");
    Ok(Self { conn, writes: Arc::new(Mutex::new(())) })
  }

  async fn insert_provinces(&self, provinces: Vec<NewProvince>) -> Result<Vec<Province>> {
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_PROVINCE)?;
        let saved = provinces
          .into_iter()
          .map(|row| insert_province(&mut stmt, row))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(saved)
      })
      .await?;
    Ok(saved)
  }

  async fn insert_cities(&self, cities: Vec<NewCity>) -> Result<Vec<City>> {
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_CITY)?;
        let saved = cities
          .into_iter()
          .map(|row| insert_city(&mut stmt, row))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(saved)
      })
      .await?;
    Ok(saved)
  }

  async fn insert_counties(&self, counties: Vec<NewCounty>) -> Result<Vec<County>> {
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_COUNTY)?;
        let saved = counties
          .into_iter()
          .map(|row| insert_county(&mut stmt, row))
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(saved)
      })
      .await?;
    Ok(saved)
  }
}

// ─── WeatherStore impl ───────────────────────────────────────────────────────

impl WeatherStore for SqliteStore {
  type Error = crate::Error;

  // ── Provinces ─────────────────────────────────────────────────────────────

  async fn save_province(&self, province: NewProvince) -> Result<Province> {
    let _guard = self.writes.lock().await;
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_PROVINCE)?;
        Ok(insert_province(&mut stmt, province)?)
      })
      .await?;
    Ok(saved)
  }

  async fn save_provinces(&self, provinces: Vec<NewProvince>) -> Result<Vec<Province>> {
    let _guard = self.writes.lock().await;
    let saved = self.insert_provinces(provinces).await?;
    tracing::debug!(count = saved.len(), "saved provinces");
    Ok(saved)
  }

  async fn load_provinces(&self) -> Result<Vec<Province>> {
    let provinces = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {PROVINCE_COLUMNS} FROM province ORDER BY id"))?;
        let rows = stmt
          .query_map([], province_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(provinces)
  }

  // ── Cities ────────────────────────────────────────────────────────────────

  async fn save_city(&self, city: NewCity) -> Result<City> {
    let _guard = self.writes.lock().await;
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_CITY)?;
        Ok(insert_city(&mut stmt, city)?)
      })
      .await?;
    Ok(saved)
  }

  async fn save_cities(&self, cities: Vec<NewCity>) -> Result<Vec<City>> {
    let _guard = self.writes.lock().await;
    let saved = self.insert_cities(cities).await?;
    tracing::debug!(count = saved.len(), "saved cities");
    Ok(saved)
  }

  async fn load_cities(&self, province_id: ProvinceId) -> Result<Vec<City>> {
    let cities = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {CITY_COLUMNS} FROM city WHERE province_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![province_id.0], city_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(cities)
  }

  // ── Counties ──────────────────────────────────────────────────────────────

  async fn save_county(&self, county: NewCounty) -> Result<County> {
    let _guard = self.writes.lock().await;
    let saved = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare_cached(INSERT_COUNTY)?;
        Ok(insert_county(&mut stmt, county)?)
      })
      .await?;
    Ok(saved)
  }

  async fn save_counties(&self, counties: Vec<NewCounty>) -> Result<Vec<County>> {
    let _guard = self.writes.lock().await;
    let saved = self.insert_counties(counties).await?;
    tracing::debug!(count = saved.len(), "saved counties");
    Ok(saved)
  }

  async fn load_counties(&self, city_id: CityId) -> Result<Vec<County>> {
    let counties = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {COUNTY_COLUMNS} FROM county WHERE city_id = ?1 ORDER BY id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![city_id.0], county_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(counties)
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_setting(&self, key: &str) -> Result<Option<String>> {
    let key = key.to_owned();
    let value = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT value FROM settings WHERE key = ?1",
              rusqlite::params![key],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(value)
  }

  async fn put_setting(&self, key: &str, value: &str) -> Result<()> {
    let _guard = self.writes.lock().await;
    let key = key.to_owned();
    let value = value.to_owned();
    self
      .conn
      .call(move |conn| {
        conn.execute(UPSERT_SETTING, rusqlite::params![key, value])?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn save_snapshot(&self, snapshot: &WeatherSnapshot) -> Result<()> {
    let _guard = self.writes.lock().await;
    let entries = snapshot_entries(snapshot);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        {
          let mut stmt = tx.prepare_cached(UPSERT_SETTING)?;
          for (key, value) in &entries {
            stmt.execute(rusqlite::params![key, value])?;
          }
        }
        tx.commit()?;
        Ok(())
      })
      .await?;

    tracing::info!(
      city = %snapshot.city_name,
      weather_code = %snapshot.weather_code,
      "weather snapshot saved"
    );
    Ok(())
  }

  async fn load_snapshot(&self) -> Result<Option<WeatherSnapshot>> {
    let entries: HashMap<String, String> = self
      .conn
      .call(|conn| {
        let placeholders = vec!["?"; SNAPSHOT_KEYS.len()].join(", ");
        let mut stmt = conn.prepare(&format!(
          "SELECT key, value FROM settings WHERE key IN ({placeholders})"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(SNAPSHOT_KEYS), |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<HashMap<_, _>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(snapshot_from_entries(&entries)?)
  }
}
