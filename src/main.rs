//! House Price Prediction Service - Main Entry Point
//!
//! Loads the model once at startup and serves predictions over HTTP.

use anyhow::{Context, Result};
use house_price_service::{
    api::{self, AppState},
    config::{AppConfig, LogFormat, LoggingConfig},
    metrics::{MetricsReporter, ServiceMetrics},
    ModelStore, PredictionService,
};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load()?;

    // Initialize logging
    init_tracing(&config.logging)?;

    info!(
        "House Price Prediction Service {} starting...",
        env!("CARGO_PKG_VERSION")
    );
    info!(
        model = %config.models.model_path,
        metadata = %config.models.metadata_path,
        "Configuration loaded successfully"
    );

    // Load model and metadata once, before accepting traffic
    let store = Arc::new(ModelStore::new(&config.models));
    if let Err(e) = store.load() {
        if config.startup.fail_on_load_error {
            return Err(e).context("Startup model load failed");
        }
        warn!(error = %e, "Failed to load model at startup; serving as unhealthy");
    }

    // Initialize metrics
    let metrics = Arc::new(ServiceMetrics::new());
    if config.metrics.report_interval_secs > 0 {
        let reporter = MetricsReporter::new(metrics.clone(), config.metrics.report_interval_secs);
        tokio::spawn(reporter.start());
        info!(
            "Metrics reporter started (interval: {}s)",
            config.metrics.report_interval_secs
        );
    } else {
        info!("Metrics reporting disabled.");
    }

    let state = AppState::new(PredictionService::new(store), metrics.clone());
    let app = api::router(state);

    let address = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!(address = %address, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Service shutting down...");
    metrics.print_summary();

    Ok(())
}

fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    // RUST_LOG wins over the configured level
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&logging.level)
            .with_context(|| format!("Invalid log level '{}'", logging.level))?,
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    match logging.format {
        LogFormat::Json => builder.json().init(),
        LogFormat::Pretty => builder.with_target(false).init(),
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received.");
}
