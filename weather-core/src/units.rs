use serde::{Deserialize, Serialize};

/// Unit system a lookup is made in. Anything that is not imperial or metric
/// falls back to the API's standard (Kelvin) units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Imperial,
    Metric,
    #[default]
    Standard,
}

impl Units {
    /// Lenient parse of a units token; never fails.
    pub fn from_token(token: Option<&str>) -> Self {
        match token {
            Some("imperial") => Units::Imperial,
            Some("metric") => Units::Metric,
            _ => Units::Standard,
        }
    }

    /// Single display letter for temperatures in this unit system.
    pub fn letter(&self) -> &'static str {
        match self {
            Units::Imperial => "F",
            Units::Metric => "C",
            Units::Standard => "K",
        }
    }

    /// Value of the `units` query parameter sent to OpenWeather.
    pub fn as_query(&self) -> &'static str {
        match self {
            Units::Imperial => "imperial",
            Units::Metric => "metric",
            Units::Standard => "standard",
        }
    }
}

impl std::fmt::Display for Units {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}

/// Display letter for a raw units token.
pub fn units_letter(token: &str) -> &'static str {
    Units::from_token(Some(token)).letter()
}
