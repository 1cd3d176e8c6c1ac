//! `SkyCast` - City weather proxy
//!
//! This library provides the provider clients, the primary/secondary
//! fallback service, the HTTP endpoints and a client for the served API.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod telemetry;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use client::{ApiClient, ViewState};
pub use config::SkycastConfig;
pub use error::SkycastError;
pub use models::{CurrentConditions, Forecast, ForecastDay, Location, Reading};
pub use service::{Strategy, WeatherService};
pub use weather::{OpenMeteoClient, OpenWeatherClient, WeatherProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkycastError>;
