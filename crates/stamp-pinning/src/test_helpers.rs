//! Scripted pinning service for tests
//!
//! Replies are consumed in order, one queue per endpoint. Every call is counted
//! and its payload recorded, so tests can assert which phases actually ran.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use stamp_core::{ContentId, MetadataDocument, PinataCredential};

use crate::traits::{PinFile, PinReceipt, PinningError, PinningResult, PinningService};

/// One scripted answer
#[derive(Debug, Clone)]
pub enum MockReply {
    Ok {
        content_id: String,
        delay: Option<Duration>,
    },
    Timeout,
    Service {
        status: u16,
        message: String,
    },
    Transport(String),
}

impl MockReply {
    pub fn ok(content_id: &str) -> Self {
        MockReply::Ok {
            content_id: content_id.to_string(),
            delay: None,
        }
    }

    /// Succeeds, but only after `delay`
    pub fn delayed(content_id: &str, delay: Duration) -> Self {
        MockReply::Ok {
            content_id: content_id.to_string(),
            delay: Some(delay),
        }
    }

    pub fn service(status: u16, message: &str) -> Self {
        MockReply::Service {
            status,
            message: message.to_string(),
        }
    }

    pub fn transport(message: &str) -> Self {
        MockReply::Transport(message.to_string())
    }

    async fn resolve(self) -> PinningResult<PinReceipt> {
        match self {
            MockReply::Ok { content_id, delay } => {
                if let Some(delay) = delay {
                    tokio::time::sleep(delay).await;
                }
                let content_id = ContentId::parse(&content_id).ok_or(PinningError::Service {
                    status: 200,
                    message: "Pin response did not contain a content identifier".to_string(),
                })?;
                Ok(PinReceipt {
                    content_id,
                    pin_size: None,
                    timestamp: None,
                })
            }
            MockReply::Timeout => Err(PinningError::Timeout),
            MockReply::Service { status, message } => {
                Err(PinningError::Service { status, message })
            }
            MockReply::Transport(message) => Err(PinningError::Transport {
                message,
                source: None,
            }),
        }
    }
}

/// In-memory [`PinningService`] that plays back scripted replies
#[derive(Debug, Default)]
pub struct MockPinningService {
    file_replies: Mutex<VecDeque<MockReply>>,
    json_replies: Mutex<VecDeque<MockReply>>,
    file_calls: AtomicUsize,
    json_calls: AtomicUsize,
    files: Mutex<Vec<PinFile>>,
    documents: Mutex<Vec<MetadataDocument>>,
}

impl MockPinningService {
    pub fn new(file_replies: Vec<MockReply>, json_replies: Vec<MockReply>) -> Self {
        Self {
            file_replies: Mutex::new(file_replies.into()),
            json_replies: Mutex::new(json_replies.into()),
            ..Self::default()
        }
    }

    pub fn file_calls(&self) -> usize {
        self.file_calls.load(Ordering::SeqCst)
    }

    pub fn json_calls(&self) -> usize {
        self.json_calls.load(Ordering::SeqCst)
    }

    pub fn pinned_files(&self) -> Vec<PinFile> {
        self.files.lock().unwrap().clone()
    }

    pub fn pinned_documents(&self) -> Vec<MetadataDocument> {
        self.documents.lock().unwrap().clone()
    }

    fn next(queue: &Mutex<VecDeque<MockReply>>) -> MockReply {
        queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| MockReply::transport("no scripted reply left"))
    }
}

#[async_trait]
impl PinningService for MockPinningService {
    async fn pin_file(
        &self,
        _credential: &PinataCredential,
        file: PinFile,
    ) -> PinningResult<PinReceipt> {
        self.file_calls.fetch_add(1, Ordering::SeqCst);
        self.files.lock().unwrap().push(file);
        Self::next(&self.file_replies).resolve().await
    }

    async fn pin_json(
        &self,
        _credential: &PinataCredential,
        document: &MetadataDocument,
    ) -> PinningResult<PinReceipt> {
        self.json_calls.fetch_add(1, Ordering::SeqCst);
        self.documents.lock().unwrap().push(document.clone());
        Self::next(&self.json_replies).resolve().await
    }
}
