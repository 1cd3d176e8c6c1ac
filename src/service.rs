//! Weather service: primary/secondary fallback orchestration
//!
//! Each request first tries the primary provider when one is configured.
//! Any primary failure is logged and the request is answered by the
//! secondary provider, whose outcome (success or error) is final.

use std::sync::Arc;

use futures::future::BoxFuture;
use tracing::{debug, info, instrument, warn};

use crate::config::SkycastConfig;
use crate::models::{CurrentConditions, Forecast};
use crate::weather::{OpenMeteoClient, OpenWeatherClient, WeatherProvider};
use crate::Result;

/// Which provider a request starts with (and which one answered it)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Primary provider configured, try it first
    TryPrimary,
    /// Go straight to the secondary provider
    UseSecondary,
}

/// Orchestrates the two-tier provider fallback
pub struct WeatherService {
    primary: Option<Arc<dyn WeatherProvider>>,
    secondary: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    /// Create a service; pass `None` as primary to always use the secondary
    pub fn new(
        primary: Option<Arc<dyn WeatherProvider>>,
        secondary: Arc<dyn WeatherProvider>,
    ) -> Self {
        Self { primary, secondary }
    }

    /// Build the OpenWeather/Open-Meteo service described by the config
    pub fn from_config(config: &SkycastConfig) -> Result<Self> {
        let primary = OpenWeatherClient::from_config(&config.primary)?
            .map(|client| Arc::new(client) as Arc<dyn WeatherProvider>);
        let secondary = Arc::new(OpenMeteoClient::new(&config.secondary)?);

        Ok(Self::new(primary, secondary))
    }

    /// Strategy every request starts in
    #[must_use]
    pub fn initial_strategy(&self) -> Strategy {
        if self.primary.is_some() {
            Strategy::TryPrimary
        } else {
            Strategy::UseSecondary
        }
    }

    /// Current conditions for a city
    #[instrument(skip(self))]
    pub async fn current(&self, city: &str) -> Result<CurrentConditions> {
        let (_, conditions) = self
            .with_fallback(city, "current", |provider, city| provider.fetch_current(city))
            .await?;
        Ok(conditions)
    }

    /// Daily forecast for a city, at most five entries
    #[instrument(skip(self))]
    pub async fn forecast(&self, city: &str) -> Result<Forecast> {
        let (answered_by, forecast) = self
            .with_fallback(city, "forecast", |provider, city| provider.fetch_forecast(city))
            .await?;

        Ok(match answered_by {
            // OpenWeather forecasts are 3-hourly
            Strategy::TryPrimary => forecast.into_daily(),
            Strategy::UseSecondary => forecast,
        })
    }

    async fn with_fallback<T, F>(
        &self,
        city: &str,
        operation: &str,
        call: F,
    ) -> Result<(Strategy, T)>
    where
        F: for<'a> Fn(&'a dyn WeatherProvider, &'a str) -> BoxFuture<'a, Result<T>>,
    {
        if let Some(primary) = self.primary.as_deref() {
            match call(primary, city).await {
                Ok(value) => {
                    debug!("{} {} answered by {}", operation, city, primary.name());
                    return Ok((Strategy::TryPrimary, value));
                }
                Err(e) => {
                    warn!(
                        "{} failed for {} ({}), trying {}...",
                        primary.name(),
                        operation,
                        e,
                        self.secondary.name()
                    );
                }
            }
        }

        let value = call(self.secondary.as_ref(), city).await?;
        info!("{} {} answered by {}", operation, city, self.secondary.name());
        Ok((Strategy::UseSecondary, value))
    }
}
