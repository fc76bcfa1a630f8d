//! Error types module
//!
//! All failures the relay can report are unified under [`AppError`]. Each variant
//! self-describes how it should be presented over HTTP through [`ErrorMetadata`],
//! so the gateway renders every error the same way without matching on variants.

use std::time::Duration;

use crate::models::Phase;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for upstream trouble outside our control
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "UPSTREAM_TIMEOUT")
    fn error_code(&self) -> &'static str;

    /// Whether the caller could reasonably try again later
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IPFS {phase} upload timed out after {}s", .after.as_secs_f64())]
    Timeout { phase: Phase, after: Duration },

    #[error("IPFS {phase} upload failed with status {status}: {message}")]
    Service {
        phase: Phase,
        status: u16,
        message: String,
    },

    #[error("IPFS {phase} upload failed: {message}")]
    Transport {
        phase: Phase,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(format!("JSON serialization error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Debug),
        AppError::Config(_) => (500, "CONFIG_ERROR", false, false, LogLevel::Error),
        AppError::Timeout { .. } => (500, "UPSTREAM_TIMEOUT", true, false, LogLevel::Warn),
        AppError::Service { status, .. } => (
            500,
            "UPSTREAM_ERROR",
            *status >= 500 || *status == 429,
            false,
            LogLevel::Warn,
        ),
        AppError::Transport { .. } => (500, "UPSTREAM_UNAVAILABLE", true, false, LogLevel::Warn),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, true, LogLevel::Error)
        }
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::InvalidInput(_) => "ValidationError",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::Config(_) => "ConfigError",
            AppError::Timeout { .. } => "TimeoutError",
            AppError::Service { .. } => "ServiceError",
            AppError::Transport { .. } => "TransportError",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Phase of the publish pipeline the error happened in, when known
    pub fn phase(&self) -> Option<Phase> {
        match self {
            AppError::Timeout { phase, .. }
            | AppError::Service { phase, .. }
            | AppError::Transport { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Error message followed by its source chain, outermost first
    pub fn error_chain(&self) -> Vec<String> {
        use std::error::Error;

        let mut chain = vec![self.to_string()];
        let mut source = self.source();
        while let Some(err) = source {
            if chain.len() > 5 {
                chain.push("... (truncated)".to_string());
                break;
            }
            chain.push(err.to_string());
            source = err.source();
        }
        chain
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        match self {
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(_) => {
                "Uploaded file exceeds the maximum allowed size.".to_string()
            }
            AppError::Config(_) => "Upload failed".to_string(),
            AppError::Timeout { phase, .. } => format!(
                "Upload failed: {} upload timed out. The file may be too large or the pinning service is slow. Please try again.",
                phase
            ),
            AppError::Service { phase, .. } | AppError::Transport { phase, .. } => {
                format!("Upload failed during {} upload", phase)
            }
            AppError::Internal(_) | AppError::InternalWithSource { .. } => {
                "Internal server error".to_string()
            }
        }
    }
}
