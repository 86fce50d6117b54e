//! Transaction Analytics API Server
//!
//! Stateless HTTP service that computes trend and volume analytics for the
//! transactions posted to it. Safe to scale horizontally.

use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use txanalytics::config::{self, AnalyticsConfig};
use txanalytics::core::http::start_server;
use txanalytics::logging;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env if present
    dotenv().ok();

    logging::init_logging();

    let port = config::get_port();
    let analytics_config = AnalyticsConfig::from_env();

    let env = config::get_environment();
    info!("Starting transaction analytics API server");
    info!(environment = %env, "Environment");
    info!(port = port, "HTTP Server: http://0.0.0.0:{}", port);
    info!(
        max_range_days = analytics_config.max_range_days,
        forecast_horizon = analytics_config.forecast_horizon,
        windows = ?analytics_config.moving_average_windows,
        "Analytics configuration"
    );

    let server_handle = tokio::spawn(async move {
        if let Err(e) = start_server(port, analytics_config).await {
            error!(error = %e, "HTTP server error");
        }
    });

    info!("API server started, waiting for shutdown signal...");
    tokio::select! {
        _ = signal::ctrl_c() => {
            info!("Shutting down API server...");
        }
        _ = server_handle => {
            error!("HTTP server stopped");
        }
    }

    Ok(())
}
