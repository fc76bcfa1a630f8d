//! Stamp Core Library
//!
//! Domain models, error types and configuration shared by the pinning client
//! and the HTTP gateway.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{Config, LogFormat, PinataConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{
    ContentId, HealthCheckResponse, MetadataDocument, Phase, PinataCredential, StatusResponse,
    UploadMeta, UploadResponse, DEFAULT_METADATA_NAME,
};
