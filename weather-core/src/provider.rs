use crate::{WeatherError, WeatherSnapshot, units::Units};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

pub use openweather::OpenWeatherProvider;

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Current weather for `city`, already validated into a snapshot.
    async fn current_weather(
        &self,
        city: &str,
        units: Units,
    ) -> Result<WeatherSnapshot, WeatherError>;
}

/// Look up both cities of a comparison. The two requests run concurrently;
/// if either fails the whole pair fails.
pub async fn fetch_pair(
    provider: &dyn WeatherProvider,
    city1: &str,
    city2: &str,
    units: Units,
) -> Result<(WeatherSnapshot, WeatherSnapshot), WeatherError> {
    tokio::try_join!(
        provider.current_weather(city1, units),
        provider.current_weather(city2, units),
    )
}

/// Trimmed city name, or `MissingParameter` naming `param` when blank.
pub fn require_city<'a>(
    value: Option<&'a str>,
    param: &'static str,
) -> Result<&'a str, WeatherError> {
    value
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or(WeatherError::MissingParameter(param))
}
