use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::service::{Strategy, WeatherService};
use crate::{Result, api};

/// API routes under `/api`, static frontend for everything else
pub fn app(service: Arc<WeatherService>, static_dir: &str) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api::router(service))
        .fallback_service(ServeDir::new(static_dir))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

pub async fn run(config: &ServerConfig, service: WeatherService) -> Result<()> {
    match service.initial_strategy() {
        Strategy::TryPrimary => tracing::info!("OpenWeather API key configured, using it first"),
        Strategy::UseSecondary => tracing::info!("No OpenWeather API key configured"),
    }

    let app = app(Arc::new(service), &config.static_dir);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server running on port {}", config.port);
    tracing::info!("Using Open-Meteo as fallback (no API key required)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
