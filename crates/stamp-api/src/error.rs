//! HTTP error response conversion
//!
//! Handlers return `Result<_, HttpAppError>`; every failure is rendered as the same
//! JSON envelope with `success: false`, so callers never see a bare fault.

use axum::{
    extract::multipart::{MultipartError, MultipartRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use stamp_core::{AppError, ErrorMetadata, LogLevel};
use stamp_pinning::LinkError;
use utoipa::ToSchema;

use crate::validation::NO_FILE_MESSAGE;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub message: String,
    /// Underlying cause, present for server-side failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Error source chain, only exposed in development
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<Vec<String>>,
}

/// Wrapper type for AppError to implement IntoResponse
#[derive(Debug)]
pub struct HttpAppError {
    pub error: AppError,
    expose_error_chain: bool,
}

impl HttpAppError {
    /// Include the error source chain in the response body
    pub fn with_error_chain(mut self, expose: bool) -> Self {
        self.expose_error_chain = expose;
        self
    }
}

impl From<AppError> for HttpAppError {
    fn from(error: AppError) -> Self {
        HttpAppError {
            error,
            expose_error_chain: false,
        }
    }
}

impl From<anyhow::Error> for HttpAppError {
    fn from(err: anyhow::Error) -> Self {
        HttpAppError::from(AppError::from(err))
    }
}

impl From<LinkError> for HttpAppError {
    fn from(err: LinkError) -> Self {
        let app = match err {
            LinkError::MissingCredential => AppError::Config(err.to_string()),
            LinkError::Timeout { phase, after } => AppError::Timeout { phase, after },
            LinkError::Service {
                phase,
                status,
                message,
            } => AppError::Service {
                phase,
                status,
                message,
            },
            LinkError::Transport {
                phase,
                message,
                source,
            } => AppError::Transport {
                phase,
                message,
                source,
            },
        };
        HttpAppError::from(app)
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(err.body_text())
        } else {
            AppError::InvalidInput(format!("Invalid multipart body: {}", err.body_text()))
        };
        HttpAppError::from(app)
    }
}

/// A request that is not multipart at all carries no file.
impl From<MultipartRejection> for HttpAppError {
    fn from(rejection: MultipartRejection) -> Self {
        tracing::debug!(rejection = %rejection.body_text(), "Upload body is not multipart");
        HttpAppError::from(AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let phase = error.phase().map(|p| p.as_str());
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, phase, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, phase, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type, phase, "Error occurred");
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.error;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let server_side = status.is_server_error();
        let error = match (server_side, app_error.is_sensitive()) {
            (false, _) => None,
            (true, true) => Some(app_error.client_message()),
            (true, false) => Some(app_error.to_string()),
        };
        let stack = (server_side && self.expose_error_chain).then(|| app_error.error_chain());

        let body = ErrorResponse {
            success: false,
            message: app_error.client_message(),
            error,
            code: app_error.error_code().to_string(),
            stack,
        };

        (status, Json(body)).into_response()
    }
}
