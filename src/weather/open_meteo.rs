//! Open-Meteo client, the key-less secondary provider
//!
//! Resolves the city through the Open-Meteo geocoding API, then queries the
//! forecast API by coordinates and maps the result into the canonical shape.
//! Open-Meteo reports no perceived temperature, visibility or cloud cover on
//! these requests, so those fields carry fixed approximations.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, info, instrument, warn};

use super::{WeatherProvider, codes};
use crate::config::SecondaryConfig;
use crate::models::{
    Condition, CurrentConditions, DEFAULT_VISIBILITY_M, Forecast, ForecastDay, Location,
    MAX_FORECAST_DAYS, MainReadings, Reading, Wind,
};
use crate::{Result, SkycastError};

const USER_AGENT: &str = concat!("SkyCast/", env!("CARGO_PKG_VERSION"));

pub(crate) const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,weather_code,wind_speed_10m,pressure_msl";
pub(crate) const DAILY_FIELDS: &str = "temperature_2m_max,weather_code";

/// Open-Meteo geocoding + forecast client
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client
    pub fn new(config: &SecondaryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| SkycastError::config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.clone(),
            forecast_url: config.forecast_url.clone(),
        })
    }

    /// Resolve a city name to its single best geocoding match
    #[instrument(skip(self))]
    pub async fn geocode(&self, city: &str) -> Result<Location> {
        let start_time = Instant::now();

        let response = self
            .client
            .get(&self.geocoding_url)
            .query(&[("name", city), ("count", "1"), ("format", "json")])
            .send()
            .await?;
        let response = ensure_success(response, "geocoding")?;

        let body: wire::GeocodingResponse = parse_json(response, "geocoding").await?;

        let Some(result) = body.results.unwrap_or_default().into_iter().next() else {
            warn!("No geocoding results found for '{}'", city);
            return Err(SkycastError::city_not_found(city));
        };

        let location = Location::from(result);
        info!(
            "Geocoded '{}' to {} ({}) in {:.3}s",
            city,
            location.display_name(),
            location.format_coordinates(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(location)
    }

    /// Query the forecast endpoint for a resolved location
    async fn forecast_request<T: DeserializeOwned>(
        &self,
        location: &Location,
        params: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let response = self
            .client
            .get(&self.forecast_url)
            .query(&[
                ("latitude", location.latitude),
                ("longitude", location.longitude),
            ])
            .query(params)
            .query(&[("timezone", "auto")])
            .send()
            .await?;
        let response = ensure_success(response, what)?;
        parse_json(response, what).await
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoClient {
    fn name(&self) -> &'static str {
        "open-meteo"
    }

    #[instrument(skip(self))]
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions> {
        let location = self.geocode(city).await?;

        let body: wire::CurrentResponse = self
            .forecast_request(
                &location,
                &[("current", CURRENT_FIELDS), ("wind_speed_unit", "ms")],
                "current weather",
            )
            .await?;

        let current = body.current.ok_or_else(|| {
            error!("Open-Meteo response has no current block");
            SkycastError::upstream("No current weather data available from Open-Meteo")
        })?;

        Ok(current.into_conditions(&location))
    }

    #[instrument(skip(self))]
    async fn fetch_forecast(&self, city: &str) -> Result<Forecast> {
        let location = self.geocode(city).await?;
        let days = MAX_FORECAST_DAYS.to_string();

        let body: wire::DailyResponse = self
            .forecast_request(
                &location,
                &[("daily", DAILY_FIELDS), ("forecast_days", days.as_str())],
                "daily forecast",
            )
            .await?;

        let daily = body.daily.ok_or_else(|| {
            error!("Open-Meteo response has no daily block");
            SkycastError::upstream("No daily forecast data available from Open-Meteo")
        })?;

        let forecast = daily.into_forecast()?;
        debug!("Mapped {} daily forecast entries", forecast.len());
        Ok(Forecast::from(forecast))
    }
}

fn ensure_success(response: Response, what: &str) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    warn!("Open-Meteo {} request failed with status {}", what, status);
    Err(SkycastError::upstream(format!(
        "Open-Meteo {what} request failed with status {status}"
    )))
}

async fn parse_json<T: DeserializeOwned>(response: Response, what: &str) -> Result<T> {
    response.json().await.map_err(|e| {
        error!("Failed to parse Open-Meteo {} response: {}", what, e);
        SkycastError::upstream(format!("Invalid {what} data received from Open-Meteo"))
    })
}

/// Midnight UTC of a `YYYY-MM-DD` day, in epoch seconds
fn day_timestamp(date: &str) -> Result<i64> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| midnight.and_utc().timestamp())
        .ok_or_else(|| SkycastError::upstream(format!("Invalid forecast date '{date}'")))
}

/// Open-Meteo API response structures
mod wire {
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResponse {
        pub results: Option<Vec<GeocodingResult>>,
    }

    #[derive(Debug, Deserialize)]
    pub struct GeocodingResult {
        pub name: String,
        pub latitude: f64,
        pub longitude: f64,
        pub country: Option<String>,
    }

    impl From<GeocodingResult> for Location {
        fn from(result: GeocodingResult) -> Self {
            Location {
                latitude: result.latitude,
                longitude: result.longitude,
                name: result.name,
                country: result.country,
            }
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentResponse {
        pub current: Option<CurrentData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct CurrentData {
        #[serde(rename = "temperature_2m")]
        pub temperature: Reading,
        #[serde(rename = "relative_humidity_2m")]
        pub humidity: Reading,
        pub weather_code: i64,
        #[serde(rename = "wind_speed_10m")]
        pub wind_speed: Reading,
        #[serde(rename = "pressure_msl")]
        pub pressure: Reading,
    }

    impl CurrentData {
        pub fn into_conditions(self, location: &Location) -> CurrentConditions {
            let main = MainReadings::new(
                self.temperature.clone(),
                self.temperature,
                self.humidity,
                self.pressure,
            );

            CurrentConditions::new(
                location.display_name(),
                main,
                Condition::new(codes::describe(self.weather_code)),
                Wind::new(self.wind_speed),
            )
            .with_visibility(DEFAULT_VISIBILITY_M)
            .with_clouds(0_i64)
        }
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyResponse {
        pub daily: Option<DailyData>,
    }

    #[derive(Debug, Deserialize)]
    pub struct DailyData {
        pub time: Vec<String>,
        #[serde(rename = "temperature_2m_max")]
        pub temperature_max: Vec<Reading>,
        pub weather_code: Vec<i64>,
    }

    impl DailyData {
        /// One entry per day, in the order Open-Meteo returned them
        pub fn into_forecast(self) -> Result<Vec<ForecastDay>> {
            let days = self.time.len();
            if self.temperature_max.len() != days || self.weather_code.len() != days {
                return Err(SkycastError::upstream(format!(
                    "Open-Meteo daily arrays disagree in length (time={}, temperature={}, code={})",
                    days,
                    self.temperature_max.len(),
                    self.weather_code.len()
                )));
            }

            self.time
                .iter()
                .zip(self.temperature_max)
                .zip(self.weather_code)
                .take(MAX_FORECAST_DAYS)
                .map(|((date, temp), code)| -> Result<ForecastDay> {
                    Ok(ForecastDay::new(day_timestamp(date)?, temp, codes::describe(code)))
                })
                .collect()
        }
    }
}
