//! Data models for the SkyCast service
//!
//! This module contains the canonical payloads served to the frontend:
//! - Location: Geocoding result and display name
//! - Weather: Current conditions snapshot
//! - Forecast: Daily forecast entries and the forecast list wrapper
//! - Reading: Numeric values that keep their JSON representation

pub mod forecast;
pub mod location;
pub mod reading;
pub mod weather;

// Re-export all public types for convenient access
pub use forecast::{Forecast, ForecastDay, ForecastReadings, MAX_FORECAST_DAYS, downsample_to_daily};
pub use location::Location;
pub use reading::Reading;
pub use weather::{Clouds, Condition, CurrentConditions, DEFAULT_VISIBILITY_M, MainReadings, Wind};
