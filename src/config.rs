//! Configuration management for `SkyCast`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkycastError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Value shipped in the sample `.env`; treated as "no key configured"
pub const PLACEHOLDER_API_KEY: &str = "your_openweather_api_key_here";

const ENV_API_KEY: &str = "SKYCAST_PRIMARY__API_KEY";
const ENV_PORT: &str = "SKYCAST_SERVER__PORT";
const LEGACY_API_KEY: &str = "OPENWEATHER_API_KEY";
const LEGACY_PORT: &str = "PORT";

/// Root configuration structure for `SkyCast`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkycastConfig {
    /// HTTP server settings
    pub server: ServerConfig,
    /// Primary (OpenWeather) provider settings
    pub primary: PrimaryConfig,
    /// Secondary (Open-Meteo) provider settings
    pub secondary: SecondaryConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Directory with the static frontend
    pub static_dir: String,
}

/// Primary provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrimaryConfig {
    /// OpenWeather API key; the primary provider is skipped without one
    pub api_key: Option<String>,
    /// Base URL for the OpenWeather 2.5 API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Secondary provider settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SecondaryConfig {
    /// Open-Meteo geocoding search endpoint
    pub geocoding_url: String,
    /// Open-Meteo forecast endpoint
    pub forecast_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_static_dir() -> String {
    "frontend".to_string()
}

fn default_primary_base_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1/search".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for PrimaryConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: default_primary_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for SecondaryConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

impl PrimaryConfig {
    /// The API key, unless it is missing, blank or the placeholder value
    #[must_use]
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key.as_deref().and_then(usable_key)
    }
}

fn usable_key(key: &str) -> Option<&str> {
    let key = key.trim();
    (!key.is_empty() && key != PLACEHOLDER_API_KEY).then_some(key)
}

impl SkycastConfig {
    /// Load configuration from the default file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(Self::get_config_path);

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment overrides, e.g. SKYCAST_PRIMARY__API_KEY. Values stay
        // strings so numeric-looking keys are kept verbatim; numeric fields
        // are parsed during deserialization.
        builder = builder.add_source(
            Environment::with_prefix("SKYCAST")
                .prefix_separator("_")
                .separator("__"),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkycastConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_legacy_env(|name| std::env::var(name).ok());
        config.validate()?;

        Ok(config)
    }

    /// Default configuration file, relative to the working directory
    #[must_use]
    pub fn get_config_path() -> PathBuf {
        PathBuf::from("skycast.toml")
    }

    /// Honor the plain `OPENWEATHER_API_KEY` and `PORT` variables.
    ///
    /// Precedence, lowest first: defaults, file, legacy variables,
    /// `SKYCAST_` variables. A blank or placeholder key never hides a usable
    /// `OPENWEATHER_API_KEY`, and a blank or placeholder `OPENWEATHER_API_KEY`
    /// is ignored.
    pub fn apply_legacy_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let legacy_key =
            lookup(LEGACY_API_KEY).and_then(|key| usable_key(&key).map(str::to_string));
        if let Some(key) = legacy_key {
            if lookup(ENV_API_KEY).is_none() || self.primary.usable_api_key().is_none() {
                self.primary.api_key = Some(key);
            }
        }

        if lookup(ENV_PORT).is_none() {
            if let Some(port) = lookup(LEGACY_PORT).and_then(|p| p.trim().parse::<u16>().ok()) {
                self.server.port = port;
            }
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        for (label, timeout) in [
            ("Primary", self.primary.timeout_seconds),
            ("Secondary", self.secondary.timeout_seconds),
        ] {
            if timeout == 0 || timeout > 300 {
                return Err(SkycastError::config(format!(
                    "{label} provider timeout must be between 1 and 300 seconds"
                ))
                .into());
            }
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkycastError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        for url in [
            &self.primary.base_url,
            &self.secondary.geocoding_url,
            &self.secondary.forecast_url,
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkycastError::config(format!(
                    "Provider URL must be a valid HTTP or HTTPS URL, got '{url}'"
                ))
                .into());
            }
        }

        Ok(())
    }
}
