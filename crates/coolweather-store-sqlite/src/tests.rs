//! Integration tests for `SqliteStore` against an in-memory database.

use std::collections::HashSet;

use chrono::NaiveDate;
use coolweather_core::{
  region::{CityId, NewCity, NewCounty, NewProvince, ProvinceId},
  settings::WEATHER_CODE,
  store::WeatherStore,
  weather::WeatherSnapshot,
};

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn snapshot(city: &str, desc: &str, day: u32) -> WeatherSnapshot {
  WeatherSnapshot {
    city_name:    city.into(),
    weather_code: "101190404".into(),
    temp_high:    "21℃".into(),
    temp_low:     "9℃".into(),
    description:  desc.into(),
    publish_time: "11:00".into(),
    fetched_date: NaiveDate::from_ymd_opt(2016, 12, day).unwrap(),
  }
}

// ─── Provinces ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn save_and_load_provinces() {
  let s = store().await;

  let names = [("01", "北京"), ("02", "上海"), ("03", "天津"), ("04", "重庆")];
  for (code, name) in names {
    s.save_province(NewProvince::new(code, name)).await.unwrap();
  }

  let loaded = s.load_provinces().await.unwrap();
  assert_eq!(loaded.len(), names.len());

  let pairs: HashSet<_> = loaded
    .iter()
    .map(|p| (p.code.as_str(), p.name.as_str()))
    .collect();
  assert_eq!(pairs, names.into_iter().collect::<HashSet<_>>());

  let ids: HashSet<_> = loaded.iter().map(|p| p.id).collect();
  assert_eq!(ids.len(), names.len());
}

#[tokio::test]
async fn empty_store_loads_nothing() {
  let s = store().await;
  assert!(s.load_provinces().await.unwrap().is_empty());
  assert!(s.load_cities(ProvinceId(1)).await.unwrap().is_empty());
  assert!(s.load_counties(CityId(1)).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_codes_are_stored_twice() {
  let s = store().await;
  let a = s.save_province(NewProvince::new("19", "江苏")).await.unwrap();
  let b = s.save_province(NewProvince::new("19", "江苏")).await.unwrap();
  assert_ne!(a.id, b.id);
  assert_eq!(s.load_provinces().await.unwrap().len(), 2);
}

#[tokio::test]
async fn batch_save_preserves_order() {
  let s = store().await;
  let saved = s
    .save_provinces(vec![
      NewProvince::new("01", "北京"),
      NewProvince::new("02", "上海"),
    ])
    .await
    .unwrap();
  assert!(saved[0].id < saved[1].id);

  let loaded = s.load_provinces().await.unwrap();
  assert_eq!(loaded, saved);
}

#[tokio::test]
async fn single_and_batch_saves_share_one_sequence() {
  let s = store().await;
  let first = s
    .save_county(NewCounty::new(CityId(3), "190401", "苏州"))
    .await
    .unwrap();
  let batch = s
    .save_counties(vec![
      NewCounty::new(CityId(3), "190402", "常熟"),
      NewCounty::new(CityId(3), "190403", "张家港"),
    ])
    .await
    .unwrap();
  let last = s
    .save_county(NewCounty::new(CityId(3), "190404", "昆山"))
    .await
    .unwrap();

  assert!(first.id < batch[0].id && batch[1].id < last.id);
  assert_eq!(first.code, "190401");
  assert_eq!(last.name, "昆山");

  let mut expected = vec![first];
  expected.extend(batch);
  expected.push(last);
  assert_eq!(s.load_counties(CityId(3)).await.unwrap(), expected);
}

// ─── Scoped loads ────────────────────────────────────────────────────────────

#[tokio::test]
async fn cities_scoped_by_province() {
  let s = store().await;
  s.save_cities(vec![
    NewCity::new(ProvinceId(5), "101", "Beijing"),
    NewCity::new(ProvinceId(5), "102", "Shanghai"),
  ])
  .await
  .unwrap();
  s.save_city(NewCity::new(ProvinceId(7), "701", "Elsewhere"))
    .await
    .unwrap();

  let five = s.load_cities(ProvinceId(5)).await.unwrap();
  assert_eq!(five.len(), 2);
  assert!(five.iter().all(|c| c.province_id == ProvinceId(5)));
  assert_eq!(five[0].name, "Beijing");
  assert_eq!(five[1].code, "102");

  let seven = s.load_cities(ProvinceId(7)).await.unwrap();
  assert_eq!(seven.len(), 1);
  assert_eq!(seven[0].name, "Elsewhere");
}

#[tokio::test]
async fn counties_read_from_county_table() {
  let s = store().await;
  let city = s
    .save_city(NewCity::new(ProvinceId(1), "1904", "苏州"))
    .await
    .unwrap();
  let county = s
    .save_county(NewCounty::new(city.id, "190404", "昆山"))
    .await
    .unwrap();

  let counties = s.load_counties(city.id).await.unwrap();
  assert_eq!(counties, vec![county]);
}

#[tokio::test]
async fn orphans_only_surface_under_their_own_id() {
  let s = store().await;
  let province = s.save_province(NewProvince::new("19", "江苏")).await.unwrap();
  s.save_city(NewCity::new(ProvinceId(999), "0000", "orphan"))
    .await
    .unwrap();

  assert!(s.load_cities(province.id).await.unwrap().is_empty());
  assert_eq!(s.load_cities(ProvinceId(999)).await.unwrap().len(), 1);
}

// ─── Settings and snapshot ───────────────────────────────────────────────────

#[tokio::test]
async fn settings_upsert() {
  let s = store().await;
  assert_eq!(s.get_setting(WEATHER_CODE).await.unwrap(), None);

  s.put_setting(WEATHER_CODE, "101010100").await.unwrap();
  s.put_setting(WEATHER_CODE, "101190404").await.unwrap();
  assert_eq!(
    s.get_setting(WEATHER_CODE).await.unwrap().as_deref(),
    Some("101190404")
  );
}

#[tokio::test]
async fn no_snapshot_until_saved() {
  let s = store().await;
  s.put_setting(WEATHER_CODE, "101190404").await.unwrap();
  assert_eq!(s.load_snapshot().await.unwrap(), None);
}

#[tokio::test]
async fn snapshot_replaced_wholesale() {
  let s = store().await;
  s.save_snapshot(&snapshot("昆山", "多云转小雨", 9)).await.unwrap();

  let newer = snapshot("苏州", "晴", 10);
  s.save_snapshot(&newer).await.unwrap();

  assert_eq!(s.load_snapshot().await.unwrap(), Some(newer));
  assert_eq!(
    s.get_setting("current_date").await.unwrap().as_deref(),
    Some("2016年12月10日")
  );
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn reopen_keeps_rows_and_schema() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("cool_weather.db");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.save_province(NewProvince::new("19", "江苏")).await.unwrap();
    s.save_snapshot(&snapshot("昆山", "多云", 9)).await.unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let provinces = s.load_provinces().await.unwrap();
  assert_eq!(provinces.len(), 1);
  assert_eq!(provinces[0].name, "江苏");
  assert!(s.load_snapshot().await.unwrap().is_some());
}

// ─── Write serialisation ─────────────────────────────────────────────────────

#[tokio::test]
async fn concurrent_batches_do_not_interleave() {
  let s = store().await;

  let batch = |tag: &'static str| {
    (0..20)
      .map(|i| NewCity::new(ProvinceId(1), format!("{tag}{i:02}"), tag))
      .collect::<Vec<_>>()
  };

  let (a, b) = tokio::join!(s.save_cities(batch("a")), s.save_cities(batch("b")));
  a.unwrap();
  b.unwrap();

  let tags: Vec<_> = s
    .load_cities(ProvinceId(1))
    .await
    .unwrap()
    .into_iter()
    .map(|c| c.name)
    .collect();
  let switches = tags.windows(2).filter(|w| w[0] != w[1]).count();
  assert_eq!(switches, 1, "batches interleaved: {tags:?}");
}
