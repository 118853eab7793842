//! SQL schema for the CoolWeather SQLite store.
//!
//! Executed at every connection startup. Every statement is idempotent, so
//! reopening an existing file leaves it untouched.

/// Full schema DDL.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Hierarchy tables are append-only.
-- Parent ids carry no REFERENCES clause: orphaned rows are allowed.
CREATE TABLE IF NOT EXISTS province (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    province_name TEXT NOT NULL,
    province_code TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS city (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    city_name   TEXT NOT NULL,
    city_code   TEXT NOT NULL,
    province_id INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS county (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    county_name TEXT NOT NULL,
    county_code TEXT NOT NULL,
    city_id     INTEGER NOT NULL
);

CREATE INDEX IF NOT EXISTS city_province_idx ON city(province_id);
CREATE INDEX IF NOT EXISTS county_city_idx   ON county(city_id);

-- Key-value settings area; holds the cached weather snapshot.
CREATE TABLE IF NOT EXISTS settings (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

PRAGMA user_version = 1;
";
