use thiserror::Error;

/// Everything that can go wrong between receiving a lookup and producing a snapshot.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// The request URL carries the API key, so it is stripped on conversion.
    #[error("Weather service could not be reached: {0}")]
    NetworkFailure(#[source] reqwest::Error),

    #[error("City not found: {0}")]
    CityNotFound(String),

    #[error("Unexpected weather data: {0}")]
    MalformedWeatherData(String),

    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    #[error("Weather service responded with status {status}: {body}")]
    Upstream { status: u16, body: String },
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        Self::NetworkFailure(e.without_url())
    }
}

impl WeatherError {
    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedWeatherData(msg.into())
    }

    /// HTTP status a web front end should answer with for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) => 400,
            Self::CityNotFound(_) => 404,
            Self::MalformedWeatherData(_) | Self::Upstream { .. } => 502,
            Self::NetworkFailure(_) => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(WeatherError::MissingParameter("city").status_code(), 400);
        assert_eq!(WeatherError::CityNotFound("Atlantis".into()).status_code(), 404);
        assert_eq!(WeatherError::malformed("no main").status_code(), 502);
        let upstream = WeatherError::Upstream {
            status: 401,
            body: "Invalid API key".into(),
        };
        assert_eq!(upstream.status_code(), 502);
    }

    #[test]
    fn missing_parameter_message_names_parameter() {
        let err = WeatherError::MissingParameter("city2");
        assert_eq!(err.to_string(), "Missing required parameter 'city2'");
    }
}
