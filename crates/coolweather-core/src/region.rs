//! The administrative hierarchy: province → city → county.
//!
//! Rows are append-only. Ids are assigned by the store at insert time; codes
//! are opaque identifiers from the upstream list service and are never
//! checked for uniqueness.

use std::fmt;

use serde::{Deserialize, Serialize};

// ─── Ids ─────────────────────────────────────────────────────────────────────

macro_rules! row_id {
  ($(#[$meta:meta])* $name:ident) => {
    $(#[$meta])*
    #[derive(
      Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct $name(pub i64);

    impl fmt::Display for $name {
      fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { self.0.fmt(f) }
    }

    impl From<i64> for $name {
      fn from(id: i64) -> Self { Self(id) }
    }
  };
}

row_id!(
  /// Store-assigned id of a [`Province`] row.
  ProvinceId
);
row_id!(
  /// Store-assigned id of a [`City`] row.
  CityId
);
row_id!(
  /// Store-assigned id of a [`County`] row.
  CountyId
);

// ─── Stored records ──────────────────────────────────────────────────────────

/// Root of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Province {
  pub id:   ProvinceId,
  pub name: String,
  pub code: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
  pub id:          CityId,
  pub province_id: ProvinceId,
  pub name:        String,
  pub code:        String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct County {
  pub id:      CountyId,
  pub city_id: CityId,
  pub name:    String,
  pub code:    String,
}

// ─── Insert inputs ───────────────────────────────────────────────────────────

/// A province that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProvince {
  pub name: String,
  pub code: String,
}

/// A city that has not been stored yet.
///
/// `province_id` is not validated; a city pointing at a missing province is
/// stored anyway and simply never shows up under a real province.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCity {
  pub province_id: ProvinceId,
  pub name:        String,
  pub code:        String,
}

/// A county that has not been stored yet. `city_id` is not validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCounty {
  pub city_id: CityId,
  pub name:    String,
  pub code:    String,
}

impl NewProvince {
  pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { name: name.into(), code: code.into() }
  }

  pub fn into_province(self, id: ProvinceId) -> Province {
    Province { id, name: self.name, code: self.code }
  }
}

impl NewCity {
  pub fn new(
    province_id: ProvinceId,
    code: impl Into<String>,
    name: impl Into<String>,
  ) -> Self {
    Self { province_id, name: name.into(), code: code.into() }
  }

  pub fn into_city(self, id: CityId) -> City {
    City {
      id,
      province_id: self.province_id,
      name: self.name,
      code: self.code,
    }
  }
}

impl NewCounty {
  pub fn new(city_id: CityId, code: impl Into<String>, name: impl Into<String>) -> Self {
    Self { city_id, name: name.into(), code: code.into() }
  }

  pub fn into_county(self, id: CountyId) -> County {
    County {
      id,
      city_id: self.city_id,
      name: self.name,
      code: self.code,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn ids_serialize_as_bare_integers() {
    let city = City {
      id:          CityId(3),
      province_id: ProvinceId(1),
      name:        "苏州".into(),
      code:        "1904".into(),
    };
    let json = serde_json::to_value(&city).unwrap();
    assert_eq!(json["id"], 3);
    assert_eq!(json["province_id"], 1);
  }

  #[test]
  fn new_county_keeps_its_scope() {
    let county = NewCounty::new(CityId(9), "190404", "昆山").into_county(CountyId(12));
    assert_eq!(county.city_id, CityId(9));
    assert_eq!(county.code, "190404");
    assert_eq!(county.name, "昆山");
  }
}
