//! Two-phase content linker
//!
//! Publishing is a strict sequence: the file is pinned first, then a metadata
//! document pointing at the file's content id is pinned, and the gateway URL of
//! that document is handed back. A failure in either phase aborts the whole
//! publish. Nothing is retried and an image pinned before a metadata failure is
//! left in place.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use stamp_core::{MetadataDocument, Phase, PinataConfig, PinataCredential, UploadMeta};
use thiserror::Error;

use crate::traits::{PinFile, PinReceipt, PinningError, PinningService};

/// File name and content type sent with every pinned file. The caller's
/// original labels are not forwarded.
pub const PINNED_FILE_NAME: &str = "upload.png";
pub const PINNED_CONTENT_TYPE: &str = "image/png";

/// Publish failures
#[derive(Debug, Error)]
pub enum LinkError {
    #[error("PINATA_JWT is missing in environment variables")]
    MissingCredential,

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
}

impl LinkError {
    fn from_pinning(phase: Phase, after: Duration, err: PinningError) -> Self {
        match err {
            PinningError::Timeout => LinkError::Timeout { phase, after },
            PinningError::Service { status, message } => LinkError::Service {
                phase,
                status,
                message,
            },
            PinningError::Transport { message, source } => LinkError::Transport {
                phase,
                message,
                source,
            },
        }
    }

    pub fn phase(&self) -> Option<Phase> {
        match self {
            LinkError::MissingCredential => None,
            LinkError::Timeout { phase, .. }
            | LinkError::Service { phase, .. }
            | LinkError::Transport { phase, .. } => Some(*phase),
        }
    }
}

/// Per-phase bounds and the gateway used to build result URLs
#[derive(Debug, Clone)]
pub struct LinkerSettings {
    pub gateway_url: String,
    pub image_timeout: Duration,
    pub metadata_timeout: Duration,
}

impl From<&PinataConfig> for LinkerSettings {
    fn from(config: &PinataConfig) -> Self {
        Self {
            gateway_url: config.gateway_url.clone(),
            image_timeout: config.image_timeout,
            metadata_timeout: config.metadata_timeout,
        }
    }
}

pub struct ContentLinker {
    pinning: Arc<dyn PinningService>,
    credential: Option<PinataCredential>,
    settings: LinkerSettings,
}

impl ContentLinker {
    pub fn new(
        pinning: Arc<dyn PinningService>,
        credential: Option<PinataCredential>,
        settings: LinkerSettings,
    ) -> Self {
        Self {
            pinning,
            credential,
            settings,
        }
    }

    pub fn from_config(config: &PinataConfig, pinning: Arc<dyn PinningService>) -> Self {
        Self::new(pinning, config.credential.clone(), LinkerSettings::from(config))
    }

    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    /// Pin `file`, then pin a metadata document referencing it, and return the
    /// gateway URL of the metadata document.
    #[tracing::instrument(skip(self, file, meta), fields(file_size = file.len()))]
    pub async fn publish(&self, file: Bytes, meta: &UploadMeta) -> Result<String, LinkError> {
        let credential = self
            .credential
            .as_ref()
            .ok_or(LinkError::MissingCredential)?;
        let started = Instant::now();

        let file_size = file.len();
        let image = self
            .run_phase(Phase::Image, self.settings.image_timeout, async {
                tracing::info!(file_size, "Starting image upload to pinning service");
                self.pinning
                    .pin_file(
                        credential,
                        PinFile {
                            data: file,
                            file_name: PINNED_FILE_NAME.to_string(),
                            content_type: PINNED_CONTENT_TYPE.to_string(),
                        },
                    )
                    .await
            })
            .await?;

        let document = MetadataDocument::new(meta, &image.content_id);
        tracing::info!(image = %document.image, "Image pinned");

        let metadata = self
            .run_phase(Phase::Metadata, self.settings.metadata_timeout, async {
                tracing::info!("Starting metadata upload to pinning service");
                self.pinning.pin_json(credential, &document).await
            })
            .await?;

        let metadata_url = metadata
            .content_id
            .to_gateway_url(&self.settings.gateway_url);
        tracing::info!(
            metadata_cid = %metadata.content_id,
            metadata_url = %metadata_url,
            total_ms = started.elapsed().as_millis() as u64,
            "Metadata pinned"
        );

        Ok(metadata_url)
    }

    async fn run_phase<F>(
        &self,
        phase: Phase,
        bound: Duration,
        call: F,
    ) -> Result<PinReceipt, LinkError>
    where
        F: Future<Output = Result<PinReceipt, PinningError>>,
    {
        let started = Instant::now();
        let result = match tokio::time::timeout(bound, call).await {
            Ok(result) => result.map_err(|e| LinkError::from_pinning(phase, bound, e)),
            Err(_) => Err(LinkError::Timeout {
                phase,
                after: bound,
            }),
        };
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &result {
            Ok(receipt) => tracing::info!(
                phase = %phase,
                content_id = %receipt.content_id,
                elapsed_ms,
                "Upload phase completed"
            ),
            Err(e) => tracing::error!(
                phase = %phase,
                error = %e,
                elapsed_ms,
                "Upload phase failed"
            ),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{MockPinningService, MockReply};

    fn settings() -> LinkerSettings {
        LinkerSettings {
            gateway_url: "https://gateway.pinata.cloud".to_string(),
            image_timeout: Duration::from_secs(30),
            metadata_timeout: Duration::from_secs(10),
        }
    }

    fn linker(mock: Arc<MockPinningService>) -> ContentLinker {
        ContentLinker::new(mock, PinataCredential::new("test-jwt"), settings())
    }

    #[tokio::test]
    async fn test_publish_returns_gateway_url_for_metadata() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::ok("QmMeta456")],
        ));

        let url = linker(mock.clone())
            .publish(
                Bytes::from(vec![1u8; 100]),
                &UploadMeta::new("Stamp A", Some(String::new())),
            )
            .await
            .unwrap();

        assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmMeta456");
        assert_eq!(mock.file_calls(), 1);
        assert_eq!(mock.json_calls(), 1);

        let documents = mock.pinned_documents();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].name, "Stamp A");
        assert_eq!(documents[0].description, "");
        assert_eq!(documents[0].image, "ipfs://QmImg123");

        let files = mock.pinned_files();
        assert_eq!(files[0].data.len(), 100);
        assert_eq!(files[0].file_name, "upload.png");
        assert_eq!(files[0].content_type, "image/png");
    }

    #[tokio::test]
    async fn test_missing_credential_makes_no_calls() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::ok("QmMeta456")],
        ));
        let linker = ContentLinker::new(mock.clone(), None, settings());

        let err = linker
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap_err();

        assert!(matches!(err, LinkError::MissingCredential));
        assert_eq!(err.phase(), None);
        assert_eq!(mock.file_calls(), 0);
        assert_eq!(mock.json_calls(), 0);
    }

    #[tokio::test]
    async fn test_image_failure_skips_metadata_phase() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::transport("connection reset by peer")],
            vec![MockReply::ok("QmMeta456")],
        ));

        let err = linker(mock.clone())
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LinkError::Transport {
                phase: Phase::Image,
                ..
            }
        ));
        assert_eq!(mock.file_calls(), 1);
        assert_eq!(mock.json_calls(), 0);
    }

    #[tokio::test]
    async fn test_metadata_timeout_is_reported_as_timeout() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::delayed("QmMeta456", Duration::from_millis(500))],
        ));
        let linker = ContentLinker::new(
            mock.clone(),
            PinataCredential::new("test-jwt"),
            LinkerSettings {
                metadata_timeout: Duration::from_millis(20),
                ..settings()
            },
        );

        let err = linker
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap_err();

        match err {
            LinkError::Timeout { phase, after } => {
                assert_eq!(phase, Phase::Metadata);
                assert_eq!(after, Duration::from_millis(20));
            }
            other => panic!("Expected Timeout, got {:?}", other),
        }
        assert_eq!(mock.file_calls(), 1);
        assert_eq!(mock.json_calls(), 1);
    }

    #[tokio::test]
    async fn test_service_timeout_maps_to_phase_timeout() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::Timeout],
            vec![],
        ));

        let err = linker(mock)
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LinkError::Timeout {
                phase: Phase::Image,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_service_error_keeps_status_and_message() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::service(403, "NO_SCOPES_FOUND")],
        ));

        let err = linker(mock)
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap_err();

        match err {
            LinkError::Service {
                phase,
                status,
                message,
            } => {
                assert_eq!(phase, Phase::Metadata);
                assert_eq!(status, 403);
                assert_eq!(message, "NO_SCOPES_FOUND");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prefixed_metadata_id_is_stripped() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::ok("ipfs://QmMeta456")],
        ));

        let url = linker(mock)
            .publish(Bytes::from_static(b"data"), &UploadMeta::new("Stamp A", None))
            .await
            .unwrap();

        assert_eq!(url, "https://gateway.pinata.cloud/ipfs/QmMeta456");
    }

    #[tokio::test]
    async fn test_identical_publishes_are_not_deduplicated() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImgA"), MockReply::ok("QmImgB")],
            vec![MockReply::ok("QmMetaA"), MockReply::ok("QmMetaB")],
        ));
        let linker = linker(mock.clone());
        let meta = UploadMeta::new("Stamp A", None);

        let first = linker
            .publish(Bytes::from_static(b"same"), &meta)
            .await
            .unwrap();
        let second = linker
            .publish(Bytes::from_static(b"same"), &meta)
            .await
            .unwrap();

        assert_ne!(first, second);
        assert_eq!(mock.file_calls(), 2);
        assert_eq!(mock.json_calls(), 2);
    }

    #[tokio::test]
    async fn test_missing_name_falls_back_to_default() {
        let mock = Arc::new(MockPinningService::new(
            vec![MockReply::ok("QmImg123")],
            vec![MockReply::ok("QmMeta456")],
        ));

        linker(mock.clone())
            .publish(Bytes::from_static(b"data"), &UploadMeta::default())
            .await
            .unwrap();

        assert_eq!(mock.pinned_documents()[0].name, "Stamp NFT");
    }
}
