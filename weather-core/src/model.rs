use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::{error::WeatherError, units::Units};

/// Current-weather payload as OpenWeather sends it.
///
/// Every field is optional here: shape problems are reported by
/// [`WeatherSnapshot::from_raw`] as named errors instead of failing somewhere
/// deep inside a field access.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWeather {
    #[serde(default)]
    pub cod: Option<serde_json::Value>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub weather: Option<Vec<RawCondition>>,
    #[serde(default)]
    pub main: Option<RawMain>,
    #[serde(default)]
    pub wind: Option<RawWind>,
    #[serde(default)]
    pub sys: Option<RawSys>,
    /// Shift in seconds from UTC.
    #[serde(default)]
    pub timezone: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCondition {
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawMain {
    #[serde(default)]
    pub temp: Option<f64>,
    #[serde(default)]
    pub humidity: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawWind {
    #[serde(default)]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSys {
    #[serde(default)]
    pub sunrise: Option<i64>,
    #[serde(default)]
    pub sunset: Option<i64>,
}

impl RawWeather {
    pub fn parse(body: &str) -> Result<Self, WeatherError> {
        serde_json::from_str(body)
            .map_err(|e| WeatherError::malformed(format!("invalid weather JSON: {e}")))
    }

    /// OpenWeather reports unknown cities with `"cod": "404"` (string or number).
    pub fn is_not_found(&self) -> bool {
        match &self.cod {
            Some(serde_json::Value::String(s)) => s == "404",
            Some(serde_json::Value::Number(n)) => n.as_u64() == Some(404),
            _ => false,
        }
    }
}

/// Normalized reading of one city's current weather.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherSnapshot {
    pub city: String,
    pub description: String,
    pub temperature: f64,
    pub humidity: u8,
    pub wind_speed: f64,
    /// Local time of the city when the payload carries its offset, UTC otherwise.
    pub sunrise: DateTime<FixedOffset>,
    pub sunset: DateTime<FixedOffset>,
    pub units: Units,
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Validate a raw payload and build a snapshot from it.
    pub fn from_raw(raw: &RawWeather, units: Units) -> Result<Self, WeatherError> {
        let city = match raw.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                let reason = raw
                    .message
                    .clone()
                    .unwrap_or_else(|| "response has no location name".to_string());
                return Err(WeatherError::CityNotFound(reason));
            }
        };

        let description = raw
            .weather
            .as_deref()
            .and_then(|conditions| conditions.first())
            .and_then(|c| c.description.clone())
            .ok_or_else(|| WeatherError::malformed(format!("no weather condition for {city}")))?;

        let main = raw
            .main
            .as_ref()
            .ok_or_else(|| WeatherError::malformed(format!("no 'main' block for {city}")))?;
        let temperature = finite(main.temp, "main.temp", &city)?;
        let humidity = main
            .humidity
            .ok_or_else(|| WeatherError::malformed(format!("missing main.humidity for {city}")))?;
        if humidity > 100 {
            return Err(WeatherError::malformed(format!(
                "humidity {humidity}% out of range for {city}"
            )));
        }

        let wind_speed = finite(raw.wind.as_ref().and_then(|w| w.speed), "wind.speed", &city)?;
        if wind_speed < 0.0 {
            return Err(WeatherError::malformed(format!(
                "negative wind speed {wind_speed} for {city}"
            )));
        }

        let offset = match raw.timezone {
            Some(secs) => FixedOffset::east_opt(secs).ok_or_else(|| {
                WeatherError::malformed(format!("timezone offset {secs}s out of range for {city}"))
            })?,
            None => Utc.fix(),
        };
        let sys = raw.sys.as_ref();
        let sunrise = local_instant(sys.and_then(|s| s.sunrise), "sys.sunrise", &city, offset)?;
        let sunset = local_instant(sys.and_then(|s| s.sunset), "sys.sunset", &city, offset)?;

        Ok(Self {
            city,
            description,
            temperature,
            humidity,
            wind_speed,
            sunrise,
            sunset,
            units,
            fetched_at: Utc::now(),
        })
    }

    pub fn units_letter(&self) -> &'static str {
        self.units.letter()
    }
}

impl From<&WeatherSnapshot> for RawWeather {
    fn from(snapshot: &WeatherSnapshot) -> Self {
        RawWeather {
            cod: Some(serde_json::Value::from(200)),
            message: None,
            name: Some(snapshot.city.clone()),
            weather: Some(vec![RawCondition {
                description: Some(snapshot.description.clone()),
            }]),
            main: Some(RawMain {
                temp: Some(snapshot.temperature),
                humidity: Some(snapshot.humidity),
            }),
            wind: Some(RawWind {
                speed: Some(snapshot.wind_speed),
            }),
            sys: Some(RawSys {
                sunrise: Some(snapshot.sunrise.timestamp()),
                sunset: Some(snapshot.sunset.timestamp()),
            }),
            timezone: Some(snapshot.sunset.offset().local_minus_utc()),
        }
    }
}

fn finite(value: Option<f64>, field: &str, city: &str) -> Result<f64, WeatherError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(WeatherError::malformed(format!("{field} is {v} for {city}"))),
        None => Err(WeatherError::malformed(format!("missing {field} for {city}"))),
    }
}

fn local_instant(
    ts: Option<i64>,
    field: &str,
    city: &str,
    offset: FixedOffset,
) -> Result<DateTime<FixedOffset>, WeatherError> {
    let ts = ts.ok_or_else(|| WeatherError::malformed(format!("missing {field} for {city}")))?;
    DateTime::from_timestamp(ts, 0)
        .map(|utc| utc.with_timezone(&offset))
        .ok_or_else(|| WeatherError::malformed(format!("{field} timestamp {ts} out of range")))
}
