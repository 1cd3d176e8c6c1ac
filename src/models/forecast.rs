//! Daily forecast model and down-sampling

use chrono::DateTime;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Condition, Reading};

/// Number of days a forecast covers
pub const MAX_FORECAST_DAYS: usize = 5;

/// Entries per day in a 3-hourly forecast (24h / 3h)
const THREE_HOURLY_STEPS_PER_DAY: usize = 8;

/// Forecast payload served to the frontend
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct Forecast {
    /// Chronological forecast entries
    #[serde(default)]
    pub list: Vec<ForecastDay>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One forecast entry
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastDay {
    /// Unix timestamp in seconds
    pub dt: i64,
    pub main: ForecastReadings,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub weather: Vec<Condition>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ForecastReadings {
    /// (Maximum) temperature in Celsius
    pub temp: Reading,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ForecastDay {
    #[must_use]
    pub fn new<S: Into<String>>(dt: i64, temp: impl Into<Reading>, description: S) -> Self {
        Self {
            dt,
            main: ForecastReadings {
                temp: temp.into(),
                extra: Map::new(),
            },
            weather: vec![Condition::new(description)],
            extra: Map::new(),
        }
    }

    /// Description of the primary condition, "unknown" when none was reported
    #[must_use]
    pub fn description(&self) -> &str {
        self.weather
            .first()
            .map_or("unknown", |c| c.description.as_str())
    }

    /// Short weekday label ("Mon", "Tue", ...) in UTC
    #[must_use]
    pub fn weekday(&self) -> String {
        DateTime::from_timestamp(self.dt, 0)
            .map(|dt| dt.format("%a").to_string())
            .unwrap_or_default()
    }
}

impl Forecast {
    /// Reduce a 3-hourly forecast to one entry per day, keeping the other
    /// top-level fields. A `cnt` field is updated to the new entry count.
    #[must_use]
    pub fn into_daily(mut self) -> Self {
        self.list = downsample_to_daily(self.list);
        if let Some(cnt) = self.extra.get_mut("cnt") {
            *cnt = Value::from(self.list.len());
        }
        self
    }
}

impl From<Vec<ForecastDay>> for Forecast {
    fn from(list: Vec<ForecastDay>) -> Self {
        Self {
            list,
            extra: Map::new(),
        }
    }
}

/// Reduce a 3-hourly forecast to one entry per day.
///
/// Takes every 8th entry starting at index 0, capped at
/// [`MAX_FORECAST_DAYS`] entries.
#[must_use]
pub fn downsample_to_daily(entries: Vec<ForecastDay>) -> Vec<ForecastDay> {
    entries
        .into_iter()
        .step_by(THREE_HOURLY_STEPS_PER_DAY)
        .take(MAX_FORECAST_DAYS)
        .collect()
}
