//! Test helpers: build AppState and router for integration tests.
//!
//! Run from workspace root: `cargo test -p stamp-api`.

#![allow(dead_code)]

pub mod fixtures;

use axum_test::TestServer;
use stamp_api::constants;
use stamp_api::setup::routes;
use stamp_api::state::AppState;
use stamp_core::{Config, PinataConfig, PinataCredential};
use stamp_pinning::{ContentLinker, PinataClient, PinningService};
use std::sync::Arc;
use std::time::Duration;

pub const TEST_JWT: &str = "test-jwt-token";
pub const TEST_GATEWAY: &str = "https://gateway.pinata.cloud";

/// API path prefix for tests (e.g. `/api`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Configuration pointing the pinning client at `api_url`.
pub fn test_config(api_url: &str, credential: Option<&str>) -> Config {
    Config {
        environment: Some("test".to_string()),
        pinata: PinataConfig {
            credential: credential.and_then(PinataCredential::new),
            api_url: api_url.to_string(),
            gateway_url: TEST_GATEWAY.to_string(),
            image_timeout: Duration::from_secs(5),
            metadata_timeout: Duration::from_secs(5),
        },
        ..Config::default()
    }
}

/// Server backed by an arbitrary pinning service.
pub fn setup_test_server(config: Config, pinning: Arc<dyn PinningService>) -> TestServer {
    let linker = ContentLinker::from_config(&config.pinata, pinning);
    let state = Arc::new(AppState::new(config, linker));
    let app = routes::setup_routes(state).expect("Failed to setup routes");
    TestServer::new(app.into_make_service()).expect("Failed to create test server")
}

/// Server backed by the real Pinata client, talking to `api_url`.
pub fn setup_pinata_server(config: Config) -> TestServer {
    let client = PinataClient::new(&config.pinata).expect("Failed to build Pinata client");
    setup_test_server(config, Arc::new(client))
}
