//! Weather providers
//!
//! Both providers answer in the canonical OpenWeather-like shape so the
//! service can swap one for the other without touching the payload.

use async_trait::async_trait;

use crate::Result;
use crate::models::{CurrentConditions, Forecast};

pub mod codes;
pub mod open_meteo;
pub mod openweather;

pub use open_meteo::OpenMeteoClient;
pub use openweather::OpenWeatherClient;

/// Capability shared by the primary and secondary providers
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Short provider name used in logs
    fn name(&self) -> &'static str;

    /// Current conditions for a free-text city name
    async fn fetch_current(&self, city: &str) -> Result<CurrentConditions>;

    /// Forecast for a free-text city name, in the provider's native
    /// granularity
    async fn fetch_forecast(&self, city: &str) -> Result<Forecast>;
}
