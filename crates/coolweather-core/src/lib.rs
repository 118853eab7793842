//! Core types and trait definitions for the CoolWeather store.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! All other crates depend on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
#![allow(async_fn_in_trait)]

pub mod error;
pub mod region;
pub mod settings;
pub mod store;
pub mod weather;

pub use error::{Error, Result};
