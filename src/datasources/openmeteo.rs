use super::ForecastSource;
use crate::config::OpenMeteoConfig;
use crate::error::{HourcastError, Result};
use crate::models::{Location, RawForecast};
use serde::Deserialize;
use std::time::Duration;

const HOURLY_FIELDS: &str = "temperature_2m,weather_code";

pub struct OpenMeteoClient {
    client: reqwest::Client,
    config: OpenMeteoConfig,
}

// Open-Meteo API response structures. Every field is optional so a partial
// body reaches the normalizer, which owns the shape checks.
#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    hourly: Option<OmHourly>,
}

#[derive(Debug, Deserialize)]
struct OmHourly {
    time: Option<Vec<Option<String>>>,
    temperature_2m: Option<Vec<Option<f64>>>,
    weather_code: Option<Vec<Option<i32>>>,
}

impl OpenMeteoClient {
    pub fn new(config: OpenMeteoConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn forecast_url(&self, location: &Location) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&hourly={}&temperature_unit=fahrenheit&timezone=auto&forecast_days={}",
            self.config.base_url.trim_end_matches('/'),
            location.latitude,
            location.longitude,
            HOURLY_FIELDS,
            self.config.forecast_days
        )
    }

    /// Fetch the hourly series for one location.
    pub async fn fetch_forecast(&self, location: &Location) -> Result<RawForecast> {
        let url = self.forecast_url(location);
        tracing::debug!(%url, "Fetching Open-Meteo forecast");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HourcastError::Fetch(format!("Open-Meteo: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(HourcastError::Fetch(format!(
                "Open-Meteo returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HourcastError::Fetch(format!("Open-Meteo: {}", e)))?;

        let parsed: OmForecastResponse = serde_json::from_str(&body).map_err(|e| {
            HourcastError::MalformedForecast(format!(
                "Failed to parse Open-Meteo response: {}",
                e
            ))
        })?;

        let hourly = parsed.hourly.ok_or_else(|| {
            HourcastError::MalformedForecast("Open-Meteo response has no hourly block".into())
        })?;

        Ok(RawForecast {
            times: hourly.time,
            temperatures_f: hourly.temperature_2m,
            weather_codes: hourly.weather_code,
        })
    }

    /// Test connection to the Open-Meteo API
    pub async fn test_connection(&self, location: &Location) -> Result<bool> {
        let response = self
            .client
            .get(self.forecast_url(location))
            .send()
            .await
            .map_err(|e| HourcastError::Fetch(format!("Open-Meteo: {}", e)))?;

        Ok(response.status().is_success())
    }
}

impl ForecastSource for OpenMeteoClient {
    async fn fetch_hourly(&self, location: &Location) -> Result<RawForecast> {
        self.fetch_forecast(location).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenMeteoClient {
        OpenMeteoClient::new(OpenMeteoConfig {
            base_url: server.uri(),
            forecast_days: 1,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn location() -> Location {
        Location::new("Philadelphia", 39.95, -75.16).unwrap()
    }

    #[test]
    fn builds_forecast_url() {
        let client = OpenMeteoClient::new(OpenMeteoConfig {
            base_url: "https://api.open-meteo.com/v1/".into(),
            ..OpenMeteoConfig::default()
        })
        .unwrap();

        assert_eq!(
            client.forecast_url(&location()),
            "https://api.open-meteo.com/v1/forecast?latitude=39.95&longitude=-75.16&hourly=temperature_2m,weather_code&temperature_unit=fahrenheit&timezone=auto&forecast_days=1"
        );
    }

    #[tokio::test]
    async fn fetches_hourly_series() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .and(query_param("latitude", "39.95"))
            .and(query_param("hourly", "temperature_2m,weather_code"))
            .and(query_param("temperature_unit", "fahrenheit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "latitude": 39.95,
                "longitude": -75.16,
                "hourly": {
                    "time": ["2024-01-01T09:00", "2024-01-01T10:00"],
                    "temperature_2m": [64.0, 42.0],
                    "weather_code": [0, 61]
                }
            })))
            .mount(&server)
            .await;

        let raw = client_for(&server).fetch_hourly(&location()).await.unwrap();
        assert_eq!(
            raw,
            RawForecast::from_series(
                &["2024-01-01T09:00", "2024-01-01T10:00"],
                &[64.0, 42.0],
                &[0, 61]
            )
        );
    }

    #[tokio::test]
    async fn keeps_nulls_for_the_normalizer() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "hourly": {
                    "time": ["2024-01-01T09:00"],
                    "temperature_2m": [null]
                }
            })))
            .mount(&server)
            .await;

        let raw = client_for(&server).fetch_hourly(&location()).await.unwrap();
        assert_eq!(raw.temperatures_f, Some(vec![None]));
        assert_eq!(raw.weather_codes, None);
    }

    #[tokio::test]
    async fn http_error_is_fetch_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_hourly(&location())
            .await
            .unwrap_err();
        assert!(matches!(err, HourcastError::Fetch(ref msg) if msg.contains("500")));
    }

    #[tokio::test]
    async fn missing_hourly_block_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "error": false
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_hourly(&location())
            .await
            .unwrap_err();
        assert!(matches!(err, HourcastError::MalformedForecast(_)));
    }

    #[tokio::test]
    async fn non_json_body_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_hourly(&location())
            .await
            .unwrap_err();
        assert!(matches!(err, HourcastError::MalformedForecast(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_fetch_error() {
        let client = OpenMeteoClient::new(OpenMeteoConfig {
            base_url: "http://127.0.0.1:9".into(),
            forecast_days: 1,
            timeout_secs: 2,
        })
        .unwrap();

        let err = client.fetch_hourly(&location()).await.unwrap_err();
        assert!(matches!(err, HourcastError::Fetch(_)));
    }

    #[tokio::test]
    async fn test_connection_reports_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
            .mount(&server)
            .await;

        assert!(client_for(&server)
            .test_connection(&location())
            .await
            .unwrap());
    }
}
