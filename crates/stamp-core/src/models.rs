//! Data models for the relay
//!
//! Everything here is request-scoped: built while handling one upload and dropped
//! once the response is sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name written into a metadata document when the caller supplied none.
pub const DEFAULT_METADATA_NAME: &str = "Stamp NFT";

const IPFS_SCHEME: &str = "ipfs://";

/// Step of the publish pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    /// Pinning the raw file bytes
    Image,
    /// Pinning the JSON metadata document
    Metadata,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Image => "image",
            Phase::Metadata => "metadata",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content identifier assigned by the pinning service.
///
/// Always bare (no `ipfs://` scheme) and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentId(String);

impl ContentId {
    /// Accepts either a bare identifier or an `ipfs://` URI. Returns `None` when
    /// nothing is left once the scheme and surrounding whitespace are removed.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let bare = trimmed.strip_prefix(IPFS_SCHEME).unwrap_or(trimmed).trim();
        if bare.is_empty() {
            None
        } else {
            Some(Self(bare.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `ipfs://<cid>`
    pub fn to_ipfs_uri(&self) -> String {
        format!("{}{}", IPFS_SCHEME, self.0)
    }

    /// `<gateway>/ipfs/<cid>`
    pub fn to_gateway_url(&self, gateway_base: &str) -> String {
        format!("{}/ipfs/{}", gateway_base.trim_end_matches('/'), self.0)
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bearer token for the pinning service. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PinataCredential(String);

impl PinataCredential {
    /// Blank values count as absent.
    pub fn new(token: impl Into<String>) -> Option<Self> {
        let token = token.into();
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            Some(Self(token.to_string()))
        }
    }

    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl fmt::Debug for PinataCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PinataCredential(<redacted>)")
    }
}

/// Caller-supplied descriptive fields for a publish.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadMeta {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UploadMeta {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            name: Some(name.into()),
            description,
        }
    }
}

/// JSON document pinned in the metadata phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct MetadataDocument {
    pub name: String,
    pub description: String,
    /// `ipfs://` URI of the pinned image
    pub image: String,
}

impl MetadataDocument {
    /// Empty strings fall back to the same defaults as missing values.
    pub fn new(meta: &UploadMeta, image: &ContentId) -> Self {
        let name = meta
            .name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_METADATA_NAME);
        Self {
            name: name.to_string(),
            description: meta.description.clone().unwrap_or_default(),
            image: image.to_ipfs_uri(),
        }
    }
}

/// Successful upload response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    /// Gateway URL of the pinned metadata document
    #[serde(rename = "metadataURL")]
    pub metadata_url: String,
}

impl UploadResponse {
    pub fn new(metadata_url: String) -> Self {
        Self {
            success: true,
            metadata_url,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthCheckResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}
