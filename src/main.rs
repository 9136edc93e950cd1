//! ExtraTrees Model API - Main Entry Point
//!
//! Loads the model and hyperparameter artifacts once at startup, then
//! serves the REST surface. A failed artifact load degrades the service
//! (per-request errors) instead of refusing to start.

use anyhow::Result;
use extratrees_api::{api, config::AppConfig, state::AppState};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Configuration first so logging can honor the configured level
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {e:#}");
        AppConfig::default()
    });

    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(format!("extratrees_api={}", config.logging.level).parse()?);
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if config.logging.format == "json" {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    info!("Starting ExtraTrees Model API");

    // Load artifacts once; continue degraded on failure
    let state = AppState::initialize(&config);
    if !state.model_loaded() {
        warn!("Model artifact unavailable, predict endpoints will report the failure");
    }
    if !state.params_loaded() {
        warn!("Hyperparameter artifact unavailable, params endpoints will report the failure");
    }

    info!("API endpoints:");
    info!("  GET  /                              - Endpoint directory");
    info!("  GET  /api/health                    - Service health");
    info!("  GET  /api/model/info                - Model metadata");
    info!("  GET  /api/model/params              - All hyperparameters");
    info!("  GET  /api/model/params/extratrees   - ExtraTrees hyperparameters");
    info!("  GET  /api/model/feature-importances - Feature importances");
    info!("  POST /api/predict                   - Predict");

    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Listening");

    axum::serve(listener, app).await?;

    Ok(())
}
