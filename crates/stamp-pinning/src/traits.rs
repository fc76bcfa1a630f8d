//! Pinning service abstraction
//!
//! The linker only talks to this trait, so the HTTP client can be swapped for a
//! scripted implementation in tests.

use async_trait::async_trait;
use bytes::Bytes;
use stamp_core::{ContentId, MetadataDocument, PinataCredential};
use thiserror::Error;

/// Pinning operation errors
#[derive(Debug, Error)]
pub enum PinningError {
    #[error("request timed out")]
    Timeout,

    #[error("pinning service responded with status {status}: {message}")]
    Service { status: u16, message: String },

    #[error("{message}")]
    Transport {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl PinningError {
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        PinningError::Transport {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

impl From<reqwest::Error> for PinningError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            PinningError::Timeout
        } else {
            PinningError::transport(err)
        }
    }
}

/// Result type for pinning operations
pub type PinningResult<T> = Result<T, PinningError>;

/// Raw file handed to the pinning service
#[derive(Debug, Clone)]
pub struct PinFile {
    pub data: Bytes,
    pub file_name: String,
    pub content_type: String,
}

/// What the pinning service reports back for one pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinReceipt {
    pub content_id: ContentId,
    pub pin_size: Option<u64>,
    pub timestamp: Option<String>,
}

/// Content-addressable pinning backend
#[async_trait]
pub trait PinningService: Send + Sync {
    /// Pin raw bytes and return the assigned content identifier
    async fn pin_file(
        &self,
        credential: &PinataCredential,
        file: PinFile,
    ) -> PinningResult<PinReceipt>;

    /// Pin a JSON metadata document and return the assigned content identifier
    async fn pin_json(
        &self,
        credential: &PinataCredential,
        document: &MetadataDocument,
    ) -> PinningResult<PinReceipt>;
}
