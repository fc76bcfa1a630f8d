//! API path constants

/// API base path prefix
pub const API_PREFIX: &str = "/api";

pub const UPLOAD_PATH: &str = "/api/upload";
pub const HEALTH_CHECK_PATH: &str = "/api/healthCheck";
pub const OPENAPI_PATH: &str = "/api/openapi.json";
pub const DOCS_PATH: &str = "/docs";
