//! OpenAPI documentation.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use stamp_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stamp Relay API",
        version = "0.1.0",
        description = "Pins an uploaded stamp image and its metadata document to IPFS through Pinata and returns the gateway URL of the metadata."
    ),
    paths(
        handlers::upload::upload,
        handlers::health::health_check,
        handlers::health::root,
    ),
    components(schemas(
        models::UploadResponse,
        models::HealthCheckResponse,
        models::StatusResponse,
        models::MetadataDocument,
        error::ErrorResponse,
    )),
    tags(
        (name = "upload", description = "File and metadata pinning"),
        (name = "health", description = "Liveness probes")
    )
)]
pub struct ApiDoc;
