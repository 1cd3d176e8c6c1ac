//! Error types and handling for `SkyCast`

use thiserror::Error;

/// Main error type for the `SkyCast` service and client
#[derive(Error, Debug)]
pub enum SkycastError {
    /// The geocoder returned no match for the requested city
    #[error("City not found: {city}")]
    CityNotFound { city: String },

    /// Transport, status, parse or shape failure from a weather provider
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Error message reported by a `SkyCast` server to a client
    #[error("{message}")]
    Remote { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkycastError {
    /// Create a new city-not-found error
    pub fn city_not_found<S: Into<String>>(city: S) -> Self {
        Self::CityNotFound { city: city.into() }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::UpstreamUnavailable {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new remote error
    pub fn remote<S: Into<String>>(message: S) -> Self {
        Self::Remote {
            message: message.into(),
        }
    }

    /// Whether the error means the city could not be resolved
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CityNotFound { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkycastError::CityNotFound { .. } => "City not found".to_string(),
            SkycastError::UpstreamUnavailable { .. } => "Failed to fetch weather data".to_string(),
            SkycastError::Config { .. } => {
                "Configuration error. Please check your config file and API keys.".to_string()
            }
            SkycastError::Remote { message } => message.clone(),
            SkycastError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<reqwest::Error> for SkycastError {
    fn from(err: reqwest::Error) -> Self {
        Self::upstream(err.to_string())
    }
}
