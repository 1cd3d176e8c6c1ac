//! OpenWeather client, the keyed primary provider
//!
//! OpenWeather already answers in the canonical shape, so responses are
//! deserialized straight into the shared models, which keep every field they
//! do not name. A payload therefore comes out exactly as OpenWeather sent
//! it, with no defaults filled in. Every failure is reported
//! as [`SkycastError::UpstreamUnavailable`]; the service decides what to do
//! with it.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use super::WeatherProvider;
use crate::config::PrimaryConfig;
use crate::models::{CurrentConditions, Forecast};
use crate::{Result, SkycastError};

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

/// Maximum number of body characters quoted in error messages
const MAX_ERROR_BODY: usize = 200;

/// OpenWeather 2.5 API client
pub struct OpenWeatherClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

impl OpenWeatherClient {
    /// Create a new OpenWeather client
    pub fn new(api_key: impl Into<String>, config: &PrimaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from configuration, `None` when no usable key is set
    pub fn from_config(config: &PrimaryConfig) -> Result<Option<Self>> {
        config
            .usable_api_key()
            .map(|key| Self::new(key, config))
            .transpose()
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        let start_time = Instant::now();

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .map_err(|e| {
                SkycastError::upstream(format!("OpenWeather {endpoint} request failed: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            SkycastError::upstream(format!("Failed to read OpenWeather {endpoint} body: {e}"))
        })?;

        if !status.is_success() {
            warn!("OpenWeather {} request returned {}", endpoint, status);
            return Err(SkycastError::upstream(format!(
                "OpenWeather {endpoint} request failed with status {status}: {}",
                truncate_body(&body)
            )));
        }

        let parsed = serde_json::from_str(&body).map_err(|e| {
            SkycastError::upstream(format!("Failed to parse OpenWeather {endpoint} JSON: {e}"))
        })?;

        debug!(
            "OpenWeather {} answered in {:.3}s",
            endpoint,
            start_time.elapsed().as_secs_f64()
        );
        Ok(parsed)
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    fn name(&self) -> &'static str {
        "openweather"
    }

    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions> {
        let conditions: CurrentConditions = self.get("weather", city).await?;
        info!("OpenWeather current conditions for {}", conditions.name);
        Ok(conditions)
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<Forecast> {
        let forecast: Forecast = self.get("forecast", city).await?;
        info!("OpenWeather returned {} forecast entries", forecast.list.len());
        Ok(forecast)
    }
}

fn truncate_body(body: &str) -> String {
    if body.chars().count() <= MAX_ERROR_BODY {
        body.to_string()
    } else {
        let head: String = body.chars().take(MAX_ERROR_BODY).collect();
        format!("{head}…")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> OpenWeatherClient {
        let config = PrimaryConfig {
            api_key: Some("test_key".to_string()),
            base_url: format!("{}/data/2.5", server.uri()),
            timeout_seconds: 5,
        };
        OpenWeatherClient::from_config(&config).unwrap().unwrap()
    }

    #[test]
    fn test_from_config_skips_placeholder() {
        let config = PrimaryConfig {
            api_key: Some(crate::config::PLACEHOLDER_API_KEY.to_string()),
            ..PrimaryConfig::default()
        };
        assert!(OpenWeatherClient::from_config(&config).unwrap().is_none());
        assert!(
            OpenWeatherClient::from_config(&PrimaryConfig::default())
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let client = OpenWeatherClient::new("secret", &PrimaryConfig::default()).unwrap();
        assert!(!format!("{client:?}").contains("secret"));
    }

    fn london_current() -> serde_json::Value {
        json!({
            "coord": {"lon": -0.13, "lat": 51.51},
            "weather": [{"id": 500, "main": "Rain", "description": "light rain", "icon": "10d"}],
            "base": "stations",
            "main": {"temp": 11.3, "feels_like": 10.2, "temp_min": 10.0, "temp_max": 12.1, "pressure": 1008, "humidity": 81},
            "wind": {"speed": 5.7, "deg": 240},
            "clouds": {"all": 75},
            "dt": 1_704_103_200,
            "sys": {"country": "GB", "sunrise": 1_704_096_000, "sunset": 1_704_124_800},
            "id": 2_643_743,
            "name": "London",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn test_fetch_current_uses_metric_query() {
        let server = MockServer::start().await;
        let mut body = london_current();
        body["visibility"] = json!(9000);
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .and(query_param("q", "London"))
            .and(query_param("appid", "test_key"))
            .and(query_param("units", "metric"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;

        let conditions = client_for(&server).fetch_current("London").await.unwrap();
        assert_eq!(conditions.name, "London");
        assert_eq!(conditions.main.temp.value(), 11.3);
        assert_eq!(conditions.main.feels_like.value(), 10.2);
        assert_eq!(conditions.main.humidity.value(), 81.0);
        assert_eq!(conditions.description(), "light rain");
        assert_eq!(conditions.format_visibility(), "9 km");
        assert_eq!(conditions.cloud_cover(), Some(75.0));
    }

    #[tokio::test]
    async fn test_current_payload_is_returned_unchanged() {
        let server = MockServer::start().await;
        // no visibility in this payload; none must be invented
        Mock::given(method("GET"))
            .and(path("/data/2.5/weather"))
            .respond_with(ResponseTemplate::new(200).set_body_json(london_current()))
            .mount(&server)
            .await;

        let conditions = client_for(&server).fetch_current("London").await.unwrap();
        assert_eq!(conditions.visibility, None);
        assert_eq!(serde_json::to_value(&conditions).unwrap(), london_current());
    }

    #[tokio::test]
    async fn test_fetch_forecast_returns_native_granularity() {
        let server = MockServer::start().await;
        let list: Vec<_> = (0..40)
            .map(|i| {
                json!({
                    "dt": 1_704_067_200 + i * 10_800,
                    "main": {"temp": f64::from(i), "humidity": 60},
                    "weather": [{"description": "overcast clouds"}]
                })
            })
            .collect();
        Mock::given(method("GET"))
            .and(path("/data/2.5/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "cod": "200",
                "cnt": 40,
                "list": list,
                "city": {"name": "London", "country": "GB"}
            })))
            .mount(&server)
            .await;

        let forecast = client_for(&server).fetch_forecast("London").await.unwrap();
        assert_eq!(forecast.list.len(), 40);
        assert_eq!(forecast.list[8].dt, 1_704_153_600);
        assert_eq!(forecast.list[8].main.extra["humidity"], 60);
        assert_eq!(forecast.extra["city"]["country"], "GB");
    }

    #[tokio::test]
    async fn test_unauthorized_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({
                "cod": 401,
                "message": "Invalid API key."
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_current("London").await.unwrap_err();
        assert!(matches!(err, SkycastError::UpstreamUnavailable { .. }));
        assert!(err.to_string().contains("401"));
    }

    #[tokio::test]
    async fn test_unknown_city_is_upstream_not_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "cod": "404",
                "message": "city not found"
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_forecast("Atlantis").await.unwrap_err();
        assert!(!err.is_not_found());
    }

    #[tokio::test]
    async fn test_unexpected_shape_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "London"})))
            .mount(&server)
            .await;

        let err = client_for(&server).fetch_current("London").await.unwrap_err();
        assert!(matches!(err, SkycastError::UpstreamUnavailable { .. }));
    }

    #[test]
    fn test_truncate_body() {
        assert_eq!(truncate_body("short"), "short");
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).chars().count(), MAX_ERROR_BODY + 1);
    }
}
