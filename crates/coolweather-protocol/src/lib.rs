//! Parsers for the upstream weather service's wire formats.
//!
//! Two formats are understood:
//!
//! - the region lists, `code|name(,code|name)*`, one list per hierarchy level
//!   ([`hierarchy`]);
//! - the `weatherinfo` JSON payload ([`weather`]).
//!
//! The `parse_*` functions are pure. The `handle_*` functions parse and then
//! persist the result through a [`coolweather_core::store::WeatherStore`].

pub mod error;
pub mod hierarchy;
pub mod weather;

pub use error::{Error, Result};
pub use hierarchy::{
  handle_cities_response, handle_counties_response, handle_provinces_response, parse_cities,
  parse_counties, parse_provinces, parse_weather_code,
};
pub use weather::{WeatherReport, handle_weather_response, parse_weather};
