//! Upload form parsing and validation
//!
//! The multipart body is read into an [`UploadForm`] first and only then checked,
//! so a missing file is always reported before a missing name.

use axum::extract::Multipart;
use bytes::Bytes;
use stamp_core::{AppError, UploadMeta};

use crate::error::HttpAppError;

pub const NO_FILE_MESSAGE: &str = "No file uploaded.";
pub const NAME_REQUIRED_MESSAGE: &str = "Metadata 'name' is required.";

const FILE_FIELD: &str = "file";
const NAME_FIELD: &str = "name";
const DESCRIPTION_FIELD: &str = "description";

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub data: Bytes,
    /// As sent by the client; only logged
    pub original_name: Option<String>,
    pub content_type: Option<String>,
}

/// Raw multipart fields, nothing checked yet
#[derive(Debug, Default)]
pub struct UploadForm {
    pub file: Option<UploadedFile>,
    pub name: Option<String>,
    pub description: Option<String>,
}

/// A validated upload: non-empty file and non-blank name
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub file: UploadedFile,
    pub name: String,
    pub description: Option<String>,
}

impl UploadRequest {
    pub fn meta(&self) -> UploadMeta {
        UploadMeta::new(self.name.clone(), self.description.clone())
    }
}

impl UploadForm {
    pub async fn from_multipart(multipart: &mut Multipart) -> Result<Self, HttpAppError> {
        let mut form = UploadForm::default();

        while let Some(field) = multipart.next_field().await? {
            let Some(field_name) = field.name().map(str::to_string) else {
                continue;
            };

            match field_name.as_str() {
                FILE_FIELD => {
                    let original_name = field.file_name().map(str::to_string);
                    let content_type = field.content_type().map(str::to_string);
                    let data = field.bytes().await?;
                    // First non-empty file part wins
                    if form.file.is_none() && !data.is_empty() {
                        form.file = Some(UploadedFile {
                            data,
                            original_name,
                            content_type,
                        });
                    }
                }
                NAME_FIELD => form.name = Some(field.text().await?),
                DESCRIPTION_FIELD => form.description = Some(field.text().await?),
                other => {
                    tracing::debug!(field = %other, "Ignoring unexpected multipart field");
                }
            }
        }

        Ok(form)
    }

    pub fn validate(self) -> Result<UploadRequest, AppError> {
        let file = self
            .file
            .filter(|file| !file.data.is_empty())
            .ok_or_else(|| AppError::InvalidInput(NO_FILE_MESSAGE.to_string()))?;

        let name = self
            .name
            .filter(|name| !name.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput(NAME_REQUIRED_MESSAGE.to_string()))?;

        Ok(UploadRequest {
            file,
            name,
            description: self.description,
        })
    }
}
