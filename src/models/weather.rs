//! Current conditions model and display methods
//!
//! Field names follow the OpenWeather JSON layout, which is the shape the
//! frontend consumes regardless of which provider answered. Fields outside
//! that layout are kept in `extra` so an OpenWeather payload is served
//! unchanged.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Reading;

/// Visibility reported when the provider has no measurement, in meters
pub const DEFAULT_VISIBILITY_M: i64 = 10_000;

/// Current weather snapshot for one place
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Display name, "City, Country" or bare name
    pub name: String,
    /// Temperature, humidity and pressure readings
    pub main: MainReadings,
    /// Conditions, first entry is the primary one
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<Condition>,
    /// Wind readings
    pub wind: Wind,
    /// Visibility in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Reading>,
    /// Cloud cover
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clouds: Option<Clouds>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MainReadings {
    /// Temperature in Celsius
    pub temp: Reading,
    /// Perceived temperature in Celsius
    pub feels_like: Reading,
    /// Relative humidity in percent
    pub humidity: Reading,
    /// Atmospheric pressure in hPa
    pub pressure: Reading,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Human-readable weather condition
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Condition {
    pub description: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Wind {
    /// Wind speed in m/s
    pub speed: Reading,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Clouds {
    /// Cloud cover percentage (0-100)
    pub all: Reading,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Condition {
    pub fn new<S: Into<String>>(description: S) -> Self {
        Self {
            description: description.into(),
            extra: Map::new(),
        }
    }
}

impl MainReadings {
    pub fn new(
        temp: impl Into<Reading>,
        feels_like: impl Into<Reading>,
        humidity: impl Into<Reading>,
        pressure: impl Into<Reading>,
    ) -> Self {
        Self {
            temp: temp.into(),
            feels_like: feels_like.into(),
            humidity: humidity.into(),
            pressure: pressure.into(),
            extra: Map::new(),
        }
    }
}

impl Wind {
    pub fn new(speed: impl Into<Reading>) -> Self {
        Self {
            speed: speed.into(),
            extra: Map::new(),
        }
    }
}

impl Clouds {
    pub fn new(all: impl Into<Reading>) -> Self {
        Self {
            all: all.into(),
            extra: Map::new(),
        }
    }
}

impl CurrentConditions {
    /// Snapshot without visibility or cloud cover
    pub fn new(name: impl Into<String>, main: MainReadings, condition: Condition, wind: Wind) -> Self {
        Self {
            name: name.into(),
            main,
            weather: vec![condition],
            wind,
            visibility: None,
            clouds: None,
            extra: Map::new(),
        }
    }

    #[must_use]
    pub fn with_visibility(mut self, meters: impl Into<Reading>) -> Self {
        self.visibility = Some(meters.into());
        self
    }

    #[must_use]
    pub fn with_clouds(mut self, percent: impl Into<Reading>) -> Self {
        self.clouds = Some(Clouds::new(percent));
        self
    }

    /// Description of the primary condition, "unknown" when none was reported
    #[must_use]
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map_or("unknown", |c| c.description.as_str())
    }

    /// Cloud cover percentage, when reported
    #[must_use]
    pub fn cloud_cover(&self) -> Option<f64> {
        self.clouds.as_ref().map(|c| c.all.value())
    }

    /// Format temperature with unit, rounded to whole degrees
    #[must_use]
    pub fn format_temperature(&self) -> String {
        format!("{:.0}°C", self.main.temp.value().round())
    }

    /// Format perceived temperature with unit
    #[must_use]
    pub fn format_feels_like(&self) -> String {
        format!("{:.0}°C", self.main.feels_like.value().round())
    }

    /// Format wind information
    #[must_use]
    pub fn format_wind(&self) -> String {
        format!("{} m/s", self.wind.speed)
    }

    /// Format visibility in kilometers, "n/a" when not reported
    #[must_use]
    pub fn format_visibility(&self) -> String {
        self.visibility
            .as_ref()
            .map_or_else(|| "n/a".to_string(), |v| format!("{} km", v.value() / 1000.0))
    }

    /// Format atmospheric pressure with unit
    #[must_use]
    pub fn format_pressure(&self) -> String {
        format!("{} hPa", self.main.pressure)
    }
}
