//! Client for a running SkyCast server
//!
//! Mirrors the browser frontend: both endpoints are requested concurrently,
//! the first failure wins, and the view keeps a loading flag that is always
//! cleared once the lookup settles.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::api::ErrorBody;
use crate::models::{CurrentConditions, Forecast};
use crate::{Result, SkycastError};

/// Shown when the server gives no error message of its own
pub const FALLBACK_ERROR: &str = "Failed to fetch weather data";

/// HTTP client for the `/api` endpoints
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub async fn fetch_weather(&self, city: &str) -> Result<CurrentConditions> {
        self.get_json("weather", city).await
    }

    pub async fn fetch_forecast(&self, city: &str) -> Result<Forecast> {
        self.get_json("forecast", city).await
    }

    /// Fetch both payloads concurrently; fails as soon as either request fails
    pub async fn lookup(&self, city: &str) -> Result<(CurrentConditions, Forecast)> {
        tokio::try_join!(self.fetch_weather(city), self.fetch_forecast(city))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T> {
        let url = format!(
            "{}/api/{}/{}",
            self.base_url,
            endpoint,
            urlencoding::encode(city)
        );

        let response = self.http.get(&url).send().await.map_err(|e| {
            debug!("Request to {} failed: {}", url, e);
            SkycastError::remote(FALLBACK_ERROR)
        })?;

        if !response.status().is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|body| body.error)
                .unwrap_or_else(|_| FALLBACK_ERROR.to_string());
            return Err(SkycastError::remote(message));
        }

        response.json().await.map_err(|e| {
            debug!("Invalid payload from {}: {}", url, e);
            SkycastError::remote(FALLBACK_ERROR)
        })
    }
}

/// State of the weather view
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub city: String,
    pub weather: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
    pub loading: bool,
    pub error: String,
}

impl ViewState {
    #[must_use]
    pub fn new(city: impl Into<String>) -> Self {
        Self {
            city: city.into(),
            ..Self::default()
        }
    }

    /// Run a lookup for the current city; a blank city is ignored
    pub async fn submit(&mut self, client: &ApiClient) {
        if self.city.trim().is_empty() {
            return;
        }

        self.loading = true;
        self.error.clear();

        match client.lookup(&self.city).await {
            Ok((weather, forecast)) => {
                self.weather = Some(weather);
                self.forecast = Some(forecast);
            }
            Err(e) => self.error = e.user_message(),
        }

        self.loading = false;
    }
}

/// Plain-text rendering of the view
impl fmt::Display for ViewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.error.is_empty() {
            writeln!(f, "Error: {}", self.error)?;
        }

        if let Some(weather) = &self.weather {
            writeln!(f, "{}", weather.name)?;
            writeln!(
                f,
                "  {}  {}",
                weather.format_temperature(),
                weather.description()
            )?;
            writeln!(
                f,
                "  Feels like: {}  Humidity: {}%  Pressure: {}",
                weather.format_feels_like(),
                weather.main.humidity,
                weather.format_pressure()
            )?;
            let clouds = weather
                .cloud_cover()
                .map_or_else(|| "n/a".to_string(), |c| format!("{c}%"));
            writeln!(
                f,
                "  Wind: {}  Visibility: {}  Clouds: {}",
                weather.format_wind(),
                weather.format_visibility(),
                clouds
            )?;
        }

        if let Some(forecast) = &self.forecast {
            writeln!(f, "\n5-Day Forecast")?;
            for day in &forecast.list {
                let temp = format!("{:.0}°C", day.main.temp.value().round());
                writeln!(f, "  {}  {:>4}  {}", day.weekday(), temp, day.description())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn paris_weather() -> serde_json::Value {
        json!({
            "name": "Paris, FR",
            "main": {"temp": 15.2, "feels_like": 15.2, "humidity": 70, "pressure": 1012},
            "weather": [{"description": "partly cloudy"}],
            "wind": {"speed": 3.1},
            "visibility": 10000,
            "clouds": {"all": 0}
        })
    }

    fn paris_forecast() -> serde_json::Value {
        json!({"list": [
            {"dt": 1_704_067_200, "main": {"temp": 4.4}, "weather": [{"description": "fog"}]},
            {"dt": 1_704_153_600, "main": {"temp": 6.6}, "weather": [{"description": "overcast"}]}
        ]})
    }

    #[tokio::test]
    async fn test_submit_success_stores_both_results() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/forecast/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_forecast()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let mut view = ViewState::new("Paris");
        view.error = "stale".to_string();
        view.submit(&client).await;

        assert!(!view.loading);
        assert!(view.error.is_empty());
        assert_eq!(view.weather.as_ref().unwrap().name, "Paris, FR");
        assert_eq!(view.forecast.as_ref().unwrap().list.len(), 2);

        let rendered = view.to_string();
        assert!(rendered.contains("Paris, FR"));
        assert!(rendered.contains("15°C  partly cloudy"));
        assert!(rendered.contains("Visibility: 10 km"));
        assert!(rendered.contains("Mon"));
        assert!(rendered.contains("fog"));
    }

    #[test]
    fn test_display_marks_unreported_readings() {
        let mut weather: CurrentConditions = serde_json::from_value(paris_weather()).unwrap();
        weather.visibility = None;
        weather.clouds = None;
        let view = ViewState {
            weather: Some(weather),
            ..ViewState::new("Paris")
        };

        let rendered = view.to_string();
        assert!(rendered.contains("Humidity: 70%  Pressure: 1012 hPa"));
        assert!(rendered.contains("Visibility: n/a  Clouds: n/a"));
    }

    #[tokio::test]
    async fn test_submit_shows_server_error_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather/Atlantis"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "City not found"})),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/forecast/Atlantis"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "City not found"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let mut view = ViewState::new("Atlantis");
        view.submit(&client).await;

        assert!(!view.loading);
        assert_eq!(view.error, "City not found");
        assert!(view.weather.is_none());
        assert!(view.to_string().starts_with("Error: City not found"));
    }

    #[tokio::test]
    async fn test_one_failed_request_fails_the_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather/Paris"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/forecast/Paris"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"error": "Failed to fetch forecast data"})),
            )
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let mut view = ViewState::new("Paris");
        view.submit(&client).await;

        assert!(!view.loading);
        assert_eq!(view.error, "Failed to fetch forecast data");
        assert!(view.weather.is_none());
        assert!(view.forecast.is_none());
    }

    #[tokio::test]
    async fn test_error_without_message_uses_fallback() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let mut view = ViewState::new("Paris");
        view.submit(&client).await;

        assert!(!view.loading);
        assert_eq!(view.error, FALLBACK_ERROR);
    }

    #[tokio::test]
    async fn test_blank_city_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        let mut view = ViewState::new("   ");
        view.submit(&client).await;

        assert!(!view.loading);
        assert!(view.error.is_empty());
    }

    #[tokio::test]
    async fn test_city_is_percent_encoded() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/weather/New%20York"))
            .respond_with(ResponseTemplate::new(200).set_body_json(paris_weather()))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(server.uri()).unwrap();
        client.fetch_weather("New York").await.unwrap();
    }
}
