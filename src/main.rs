use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use skycast::{ApiClient, SkycastConfig, ViewState, WeatherService, telemetry, web};

#[derive(Debug, Parser)]
#[command(name = "skycast", version, about = "City weather proxy with OpenWeather and Open-Meteo fallback")]
struct Cli {
    /// Configuration file (defaults to ./skycast.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve {
        /// Port to listen on, overrides the configuration
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Look up a city against a running server
    Lookup {
        /// City name
        city: String,
        /// Base URL of the server
        #[arg(long, default_value = "http://localhost:5000")]
        server: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = SkycastConfig::load_from_path(cli.config)?;

    telemetry::init(&config.logging)?;

    match cli.command.unwrap_or(Command::Serve { port: None }) {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let service = WeatherService::from_config(&config)
                .context("Failed to initialize weather providers")?;
            web::run(&config.server, service).await?;
        }
        Command::Lookup { city, server } => {
            let client = ApiClient::new(server)?;
            let mut view = ViewState::new(city);
            view.submit(&client).await;
            print!("{view}");
            if !view.error.is_empty() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
