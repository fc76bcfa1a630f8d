//! Liveness handlers. Stateless, no dependencies.

use axum::Json;
use stamp_core::{HealthCheckResponse, StatusResponse};

/// Liveness probe
#[utoipa::path(
    get,
    path = "/api/healthCheck",
    tag = "health",
    responses(
        (status = 200, description = "Server is running", body = HealthCheckResponse)
    )
)]
pub async fn health_check() -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        success: true,
        message: "Server is running".to_string(),
    })
}

/// Root status
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses(
        (status = 200, description = "API is up", body = StatusResponse)
    )
)]
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "ok".to_string(),
        message: "Stamp NFT API is running".to_string(),
    })
}
