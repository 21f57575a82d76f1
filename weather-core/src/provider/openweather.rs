use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use crate::{
    Config, WeatherError,
    model::{RawWeather, WeatherSnapshot},
    units::Units,
};

use super::WeatherProvider;

/// Client for OpenWeather's current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    api_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(
        api_key: String,
        api_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            api_key,
            api_url: api_url.into(),
            http,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.require_api_key()?.to_owned();
        Ok(Self::new(api_key, config.api_url(), config.timeout())?)
    }

    async fn fetch_current(&self, city: &str, units: Units) -> Result<WeatherSnapshot, WeatherError> {
        tracing::debug!(%city, %units, "requesting current weather");

        let res = self
            .http
            .get(&self.api_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", units.as_query()),
            ])
            .send()
            .await?;

        let status = res.status();
        let body = res.text().await?;

        if status == StatusCode::NOT_FOUND {
            let message = RawWeather::parse(&body)
                .ok()
                .and_then(|raw| raw.message)
                .unwrap_or_else(|| "city not found".to_string());
            return Err(WeatherError::CityNotFound(format!("{city}: {message}")));
        }

        if !status.is_success() {
            return Err(WeatherError::Upstream {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        let raw = RawWeather::parse(&body)?;
        if raw.is_not_found() {
            return Err(WeatherError::CityNotFound(city.to_string()));
        }

        WeatherSnapshot::from_raw(&raw, units)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn current_weather(
        &self,
        city: &str,
        units: Units,
    ) -> Result<WeatherSnapshot, WeatherError> {
        let result = self.fetch_current(city, units).await;
        if let Err(e) = &result {
            tracing::warn!(%city, error = %e, "weather lookup failed");
        }
        result
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn provider(server: &MockServer) -> OpenWeatherProvider {
        let url = format!("{}/data/2.5/weather", server.uri());
        OpenWeatherProvider::new("test_key".into(), url, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_current_weather() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "San Francisco"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "imperial"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "cod": 200,
                "name": "San Francisco",
                "timezone": -28800,
                "weather": [{"id": 701, "main": "Mist", "description": "mist"}],
                "main": {"temp": 58.3, "feels_like": 57.0, "humidity": 87},
                "wind": {"speed": 9.22, "deg": 250},
                "sys": {"country": "US", "sunrise": 1700059000, "sunset": 1700095600}
            })))
            .mount(&mock_server)
            .await;

        let snap = provider(&mock_server)
            .current_weather("San Francisco", Units::Imperial)
            .await
            .unwrap();

        assert_eq!(snap.city, "San Francisco");
        assert_eq!(snap.description, "mist");
        assert_eq!(snap.temperature, 58.3);
        assert_eq!(snap.humidity, 87);
        assert_eq!(snap.units_letter(), "F");
        assert_eq!(snap.sunset.offset().local_minus_utc(), -28800);
    }

    #[tokio::test]
    async fn test_standard_units_sent_for_unknown_token() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("units", "standard"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Reykjavik",
                "weather": [{"description": "light snow"}],
                "main": {"temp": 271.4, "humidity": 93},
                "wind": {"speed": 11.0},
                "sys": {"sunrise": 1700040000, "sunset": 1700060000}
            })))
            .mount(&mock_server)
            .await;

        let snap = provider(&mock_server)
            .current_weather("Reykjavik", Units::from_token(Some("rankine")))
            .await
            .unwrap();

        assert_eq!(snap.units_letter(), "K");
    }

    #[tokio::test]
    async fn test_city_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current_weather("Atlantis", Units::Metric)
            .await
            .unwrap_err();

        match err {
            WeatherError::CityNotFound(msg) => assert_eq!(msg, "Atlantis: city not found"),
            other => panic!("expected CityNotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unauthorized_is_upstream_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current_weather("Paris", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::Upstream { status: 401, .. }));
        assert!(err.to_string().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn test_empty_condition_list_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "name": "Paris",
                "weather": [],
                "main": {"temp": 15, "humidity": 60},
                "wind": {"speed": 3.1},
                "sys": {"sunrise": 1700000000, "sunset": 1700040000}
            })))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current_weather("Paris", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::MalformedWeatherData(_)));
    }

    #[tokio::test]
    async fn test_non_json_body_is_malformed() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
            .mount(&mock_server)
            .await;

        let err = provider(&mock_server)
            .current_weather("Paris", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::MalformedWeatherData(_)));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_failure() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/data/2.5/weather");
        let provider = OpenWeatherProvider::new("k".into(), url, Duration::from_secs(2)).unwrap();

        let err = provider
            .current_weather("Paris", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::NetworkFailure(_)));
        assert_eq!(err.status_code(), 503);
    }

    #[tokio::test]
    async fn test_network_failure_hides_api_key() {
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{port}/data/2.5/weather");
        let provider =
            OpenWeatherProvider::new("SECRET_KEY_123".into(), url, Duration::from_secs(2)).unwrap();

        let err = provider
            .current_weather("Paris", Units::Metric)
            .await
            .unwrap_err();

        assert!(matches!(err, WeatherError::NetworkFailure(_)));
        assert!(!err.to_string().contains("SECRET_KEY_123"));
        assert!(!format!("{err:?}").contains("SECRET_KEY_123"));
    }

    #[test]
    fn from_config_requires_api_key() {
        let err = OpenWeatherProvider::from_config(&Config::default()).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
    }

    #[test]
    fn long_bodies_are_truncated() {
        let body = "x".repeat(500);
        assert_eq!(truncate_body(&body).len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
