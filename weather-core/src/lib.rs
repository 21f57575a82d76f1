//! Core library for the `weather` app.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather fetcher behind the `WeatherProvider` trait
//! - Snapshot normalization of raw API payloads
//! - The two-city comparison
//!
//! It is used by `weather-cli` (terminal output and the HTML front end).

pub mod compare;
pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod units;

pub use compare::{ComparisonResult, Magnitude, SunsetDirection, TempDirection, compare};
pub use config::Config;
pub use error::WeatherError;
pub use model::{RawWeather, WeatherSnapshot};
pub use provider::{OpenWeatherProvider, WeatherProvider, fetch_pair};
pub use units::{Units, units_letter};
