//! Relative description of two cities' current weather.
//!
//! Every difference is non-negative; the paired direction says which side was
//! larger, from the first city's point of view. Equal values land on the
//! second branch (colder / less / earlier).

use chrono::Duration;

use crate::{error::WeatherError, model::WeatherSnapshot};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempDirection {
    Warmer,
    Colder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Magnitude {
    Greater,
    Less,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SunsetDirection {
    Earlier,
    Later,
}

impl TempDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TempDirection::Warmer => "warmer",
            TempDirection::Colder => "colder",
        }
    }
}

impl Magnitude {
    pub fn as_str(&self) -> &'static str {
        match self {
            Magnitude::Greater => "greater",
            Magnitude::Less => "less",
        }
    }
}

impl SunsetDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SunsetDirection::Earlier => "earlier",
            SunsetDirection::Later => "later",
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),*) => {
        $(impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

display_as_str!(TempDirection, Magnitude, SunsetDirection);

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonResult {
    pub temp_direction: TempDirection,
    /// Rounded to 2 decimals.
    pub temp_difference: f64,
    pub humidity_direction: Magnitude,
    pub humidity_difference: u8,
    pub wind_direction: Magnitude,
    /// Rounded to 2 decimals.
    pub wind_difference: f64,
    pub sunset_direction: SunsetDirection,
    pub sunset_difference: Duration,
}

/// Compare `a` against `b`, in fetch order.
pub fn compare(a: &WeatherSnapshot, b: &WeatherSnapshot) -> Result<ComparisonResult, WeatherError> {
    if a.units != b.units {
        return Err(WeatherError::MalformedWeatherData(format!(
            "cannot compare {} ({}) with {} ({})",
            a.city, a.units, b.city, b.units
        )));
    }
    for snap in [a, b] {
        if !snap.temperature.is_finite() || !snap.wind_speed.is_finite() {
            return Err(WeatherError::MalformedWeatherData(format!(
                "non-finite reading for {}",
                snap.city
            )));
        }
    }

    let (temp_direction, temp_difference) = if a.temperature > b.temperature {
        (TempDirection::Warmer, round2(a.temperature - b.temperature))
    } else {
        (TempDirection::Colder, round2(b.temperature - a.temperature))
    };

    let (humidity_direction, humidity_difference) = if a.humidity > b.humidity {
        (Magnitude::Greater, a.humidity - b.humidity)
    } else {
        (Magnitude::Less, b.humidity - a.humidity)
    };

    let (wind_direction, wind_difference) = if a.wind_speed > b.wind_speed {
        (Magnitude::Greater, round2(a.wind_speed - b.wind_speed))
    } else {
        (Magnitude::Less, round2(b.wind_speed - a.wind_speed))
    };

    let (sunset_direction, sunset_difference) = if a.sunset > b.sunset {
        (SunsetDirection::Later, a.sunset - b.sunset)
    } else {
        (SunsetDirection::Earlier, b.sunset - a.sunset)
    };

    Ok(ComparisonResult {
        temp_direction,
        temp_difference,
        humidity_direction,
        humidity_difference,
        wind_direction,
        wind_difference,
        sunset_direction,
        sunset_difference,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `H:MM:SS`, prefixed with the day count once the span reaches a day.
pub fn format_duration(d: Duration) -> String {
    let total = d.num_seconds().abs();
    let days = total / 86_400;
    let rest = total % 86_400;
    let hms = format!("{}:{:02}:{:02}", rest / 3600, (rest % 3600) / 60, rest % 60);
    match days {
        0 => hms,
        1 => format!("1 day, {hms}"),
        n => format!("{n} days, {hms}"),
    }
}
