// Pinata pinning API client

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;
use stamp_core::{ContentId, MetadataDocument, PinataConfig, PinataCredential};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;

use crate::traits::{PinFile, PinReceipt, PinningError, PinningResult, PinningService};

const PIN_FILE_PATH: &str = "/pinning/pinFileToIPFS";
const PIN_JSON_PATH: &str = "/pinning/pinJSONToIPFS";
const MAX_ERROR_BODY_CHARS: usize = 500;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PinResponse {
    ipfs_hash: String,
    pin_size: Option<u64>,
    timestamp: Option<String>,
}

/// Pinata API client
pub struct PinataClient {
    http_client: Client,
    api_url: String,
    image_timeout: Duration,
    metadata_timeout: Duration,
}

impl Debug for PinataClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PinataClient")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl PinataClient {
    pub fn new(config: &PinataConfig) -> Result<Self> {
        let http_client = Client::builder()
            .build()
            .context("Failed to create HTTP client for Pinata")?;

        Ok(Self {
            http_client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            image_timeout: config.image_timeout,
            metadata_timeout: config.metadata_timeout,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, request: RequestBuilder) -> PinningResult<PinReceipt> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = service_error_message(&error_text);
            tracing::error!(
                status = status.as_u16(),
                body = %truncate(&error_text),
                "Pinata API error"
            );
            return Err(PinningError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await?;
        let parsed: PinResponse =
            serde_json::from_str(&body).map_err(|e| PinningError::Service {
                status: status.as_u16(),
                message: format!("Failed to parse pin response: {}", e),
            })?;

        let content_id =
            ContentId::parse(&parsed.ipfs_hash).ok_or_else(|| PinningError::Service {
                status: status.as_u16(),
                message: "Pin response did not contain a content identifier".to_string(),
            })?;

        Ok(PinReceipt {
            content_id,
            pin_size: parsed.pin_size,
            timestamp: parsed.timestamp,
        })
    }
}

#[async_trait]
impl PinningService for PinataClient {
    async fn pin_file(
        &self,
        credential: &PinataCredential,
        file: PinFile,
    ) -> PinningResult<PinReceipt> {
        // `Bytes` converts into a body without copying the upload
        let length = file.data.len() as u64;
        let part = reqwest::multipart::Part::stream_with_length(file.data, length)
            .file_name(file.file_name)
            .mime_str(&file.content_type)
            .map_err(PinningError::transport)?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let request = self
            .http_client
            .post(self.endpoint(PIN_FILE_PATH))
            .header("authorization", credential.bearer_header())
            .timeout(self.image_timeout)
            .multipart(form);

        self.send(request).await
    }

    async fn pin_json(
        &self,
        credential: &PinataCredential,
        document: &MetadataDocument,
    ) -> PinningResult<PinReceipt> {
        let request = self
            .http_client
            .post(self.endpoint(PIN_JSON_PATH))
            .header("authorization", credential.bearer_header())
            .header("content-type", "application/json")
            .timeout(self.metadata_timeout)
            .json(document);

        self.send(request).await
    }
}

/// Pull a human-readable message out of a Pinata error body.
///
/// Pinata answers with `{"error": {"reason", "details"}}` or `{"error": "..."}`.
fn service_error_message(body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<Value>(body) {
        if let Some(error) = json.get("error") {
            let message = error
                .get("details")
                .and_then(Value::as_str)
                .or_else(|| error.as_str())
                .or_else(|| error.get("reason").and_then(Value::as_str));
            if let Some(message) = message {
                return message.to_string();
            }
        }
        if let Some(message) = json.get("message").and_then(Value::as_str) {
            return message.to_string();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Unknown error".to_string()
    } else {
        truncate(trimmed)
    }
}

fn truncate(text: &str) -> String {
    text.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use mockito::{Matcher, Server};

    fn client_for(server: &Server) -> PinataClient {
        let config = PinataConfig {
            api_url: server.url(),
            image_timeout: Duration::from_secs(5),
            metadata_timeout: Duration::from_secs(5),
            ..PinataConfig::default()
        };
        PinataClient::new(&config).unwrap()
    }

    fn credential() -> PinataCredential {
        PinataCredential::new("test-jwt").unwrap()
    }

    #[tokio::test]
    async fn test_pin_file_sends_multipart_with_bearer() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pinning/pinFileToIPFS")
            .match_header("authorization", "Bearer test-jwt")
            .match_header(
                "content-type",
                Matcher::Regex("^multipart/form-data; boundary=.+".to_string()),
            )
            .match_body(Matcher::Regex("filename=\"upload.png\"".to_string()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"IpfsHash":"QmImg123","PinSize":100,"Timestamp":"2024-01-01T00:00:00Z"}"#)
            .expect(1)
            .create_async()
            .await;

        let receipt = client_for(&server)
            .pin_file(
                &credential(),
                PinFile {
                    data: Bytes::from(vec![7u8; 100]),
                    file_name: "upload.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await
            .expect("pin should succeed");

        mock.assert_async().await;
        assert_eq!(receipt.content_id.as_str(), "QmImg123");
        assert_eq!(receipt.pin_size, Some(100));
    }

    #[tokio::test]
    async fn test_pin_file_streams_file_bytes_intact() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pinning/pinFileToIPFS")
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("(?i)content-type: image/png".to_string()),
                Matcher::Regex("\r\n\r\nstamp-bytes-0123456789\r\n--".to_string()),
            ]))
            .with_status(200)
            .with_body(r#"{"IpfsHash":"QmImg123"}"#)
            .expect(1)
            .create_async()
            .await;

        let receipt = client_for(&server)
            .pin_file(
                &credential(),
                PinFile {
                    data: Bytes::from_static(b"stamp-bytes-0123456789"),
                    file_name: "upload.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await
            .expect("pin should succeed");

        mock.assert_async().await;
        assert_eq!(receipt.content_id.as_str(), "QmImg123");
    }

    #[tokio::test]
    async fn test_pin_json_sends_document() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .match_header("authorization", "Bearer test-jwt")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(serde_json::json!({
                "name": "Stamp A",
                "description": "",
                "image": "ipfs://QmImg123"
            })))
            .with_status(200)
            .with_body(r#"{"IpfsHash":"QmMeta456"}"#)
            .create_async()
            .await;

        let document = MetadataDocument {
            name: "Stamp A".to_string(),
            description: String::new(),
            image: "ipfs://QmImg123".to_string(),
        };
        let receipt = client_for(&server)
            .pin_json(&credential(), &document)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(receipt.content_id.as_str(), "QmMeta456");
        assert_eq!(receipt.pin_size, None);
    }

    #[tokio::test]
    async fn test_service_error_propagates_status_and_details() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/pinning/pinJSONToIPFS")
            .with_status(401)
            .with_body(r#"{"error":{"reason":"INVALID_CREDENTIALS","details":"Invalid API key"}}"#)
            .create_async()
            .await;

        let document = MetadataDocument {
            name: "x".to_string(),
            description: String::new(),
            image: "ipfs://Qm".to_string(),
        };
        let err = client_for(&server)
            .pin_json(&credential(), &document)
            .await
            .unwrap_err();

        match err {
            PinningError::Service { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid API key");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_hash_is_service_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/pinning/pinFileToIPFS")
            .with_status(200)
            .with_body(r#"{"IpfsHash":""}"#)
            .create_async()
            .await;

        let err = client_for(&server)
            .pin_file(
                &credential(),
                PinFile {
                    data: Bytes::from_static(b"abc"),
                    file_name: "upload.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PinningError::Service { status: 200, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let config = PinataConfig {
            // Port 1 is reserved and refuses connections
            api_url: "http://127.0.0.1:1".to_string(),
            ..PinataConfig::default()
        };
        let err = PinataClient::new(&config)
            .unwrap()
            .pin_file(
                &credential(),
                PinFile {
                    data: Bytes::from_static(b"abc"),
                    file_name: "upload.png".to_string(),
                    content_type: "image/png".to_string(),
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, PinningError::Transport { .. }));
    }

    #[test]
    fn test_service_error_message_variants() {
        assert_eq!(
            service_error_message(r#"{"error":"Payload too large"}"#),
            "Payload too large"
        );
        assert_eq!(
            service_error_message(r#"{"error":{"reason":"NO_SCOPES_FOUND"}}"#),
            "NO_SCOPES_FOUND"
        );
        assert_eq!(service_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(service_error_message(""), "Unknown error");
    }
}
