//! HTTP endpoints for current weather and forecast
//!
//! Both routes take the city as a path segment (already URL-decoded by
//! axum) and delegate to the [`WeatherService`].

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::SkycastError;
use crate::models::{CurrentConditions, Forecast};
use crate::service::WeatherService;

pub const CITY_NOT_FOUND: &str = "City not found";
pub const WEATHER_FAILED: &str = "Failed to fetch weather data";
pub const FORECAST_FAILED: &str = "Failed to fetch forecast data";

/// Error payload, `{"error": "..."}`
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ErrorBody {
    pub error: String,
}

/// Error response of an endpoint
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: &'static str,
}

impl ApiError {
    /// Map a service error; `failure_message` is the endpoint's generic
    /// failure text
    fn from_service(err: &SkycastError, failure_message: &'static str) -> Self {
        if err.is_not_found() {
            Self {
                status: StatusCode::NOT_FOUND,
                message: CITY_NOT_FOUND,
            }
        } else {
            Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: failure_message,
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.message.to_string(),
        };
        (self.status, Json(body)).into_response()
    }
}

pub fn router(service: Arc<WeatherService>) -> Router {
    Router::new()
        .route("/weather/{city}", get(get_weather))
        .route("/forecast/{city}", get(get_forecast))
        .with_state(service)
}

async fn get_weather(
    State(service): State<Arc<WeatherService>>,
    Path(city): Path<String>,
) -> Result<Json<CurrentConditions>, ApiError> {
    match service.current(&city).await {
        Ok(conditions) => Ok(Json(conditions)),
        Err(e) => Err(log_failure("Weather", &city, &e, WEATHER_FAILED)),
    }
}

async fn get_forecast(
    State(service): State<Arc<WeatherService>>,
    Path(city): Path<String>,
) -> Result<Json<Forecast>, ApiError> {
    match service.forecast(&city).await {
        Ok(forecast) => Ok(Json(forecast)),
        Err(e) => Err(log_failure("Forecast", &city, &e, FORECAST_FAILED)),
    }
}

fn log_failure(
    endpoint: &str,
    city: &str,
    err: &SkycastError,
    failure_message: &'static str,
) -> ApiError {
    if err.is_not_found() {
        info!("{} lookup for '{}': {}", endpoint, city, err);
    } else {
        error!("{} API error for '{}': {}", endpoint, city, err);
    }
    ApiError::from_service(err, failure_message)
}
