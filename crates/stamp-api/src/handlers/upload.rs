use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};
use stamp_core::UploadResponse;

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use crate::validation::UploadForm;

/// Upload handler
///
/// Reads the multipart form, validates it, and hands the file to the linker,
/// which pins the file and then a metadata document pointing at it.
///
/// # Errors
/// - `400` - no file, or no `name`
/// - `413` - body exceeds the configured upload limit
/// - `500` - missing credential, or either pinning phase failed
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "upload",
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File and metadata pinned", body = UploadResponse),
        (status = 400, description = "Missing file or name", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Pinning failed", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, multipart), fields(operation = "upload"))]
pub async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, HttpAppError> {
    let mut multipart = multipart?;
    let request = UploadForm::from_multipart(&mut multipart)
        .await?
        .validate()?;

    tracing::info!(
        original_name = ?request.file.original_name,
        content_type = ?request.file.content_type,
        file_size = request.file.data.len(),
        name = %request.name,
        description = request.description.as_deref().unwrap_or("(none)"),
        "Upload request received"
    );

    let started = Instant::now();
    let meta = request.meta();
    let metadata_url = state
        .linker
        .publish(request.file.data, &meta)
        .await
        .map_err(|e| HttpAppError::from(e).with_error_chain(state.expose_error_chain()))?;

    tracing::info!(
        metadata_url = %metadata_url,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Upload completed"
    );

    Ok(Json(UploadResponse::new(metadata_url)))
}
