//! Mapping between SQLite rows and domain records.
//!
//! Every `SELECT` in the store lists its columns in the order these
//! functions read them.

use coolweather_core::region::{City, CityId, County, CountyId, Province, ProvinceId};
use rusqlite::Row;

pub const PROVINCE_COLUMNS: &str = "id, province_name, province_code";
pub const CITY_COLUMNS: &str = "id, province_id, city_name, city_code";
pub const COUNTY_COLUMNS: &str = "id, city_id, county_name, county_code";

pub fn province_from_row(row: &Row<'_>) -> rusqlite::Result<Province> {
  Ok(Province {
    id:   ProvinceId(row.get(0)?),
    name: row.get(1)?,
    code: row.get(2)?,
  })
}

pub fn city_from_row(row: &Row<'_>) -> rusqlite::Result<City> {
  Ok(City {
    id:          CityId(row.get(0)?),
    province_id: ProvinceId(row.get(1)?),
    name:        row.get(2)?,
    code:        row.get(3)?,
  })
}

pub fn county_from_row(row: &Row<'_>) -> rusqlite::Result<County> {
  Ok(County {
    id:      CountyId(row.get(0)?),
    city_id: CityId(row.get(1)?),
    name:    row.get(2)?,
    code:    row.get(3)?,
  })
}
