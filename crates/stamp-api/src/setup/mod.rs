//! Application setup and initialization

pub mod routes;
pub mod server;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use stamp_core::Config;
use stamp_pinning::{ContentLinker, PinataClient};
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry(config.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    validation::validate_config(&config).context("Configuration validation failed")?;
    tracing::info!("Configuration loaded and validated successfully");

    let pinata = Arc::new(PinataClient::new(&config.pinata)?);
    let linker = ContentLinker::from_config(&config.pinata, pinata);
    let state = Arc::new(AppState::new(config, linker));

    let router = routes::setup_routes(state.clone())?;

    Ok((state, router))
}
