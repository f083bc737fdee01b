//! File upload endpoint

use axum::{
    extract::{Multipart, Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{UploadResponse, UploadedFile};

/// POST /api/sessions/:id/upload - Replace the session's file
///
/// Takes the first multipart field that carries a file name.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let handle = state.registry().get(&id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        let Some(filename) = field.file_name().map(str::to_string) else {
            continue;
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::BadRequest(format!("Failed to read file: {}", e)))?;
        upload = Some(UploadedFile::new(filename, data));
        break;
    }

    let file = upload.ok_or_else(|| Error::BadRequest("No file in upload".to_string()))?;
    tracing::info!("Session {}: received {} ({} bytes)", id, file.filename, file.size());

    let mut session = handle.lock().await;
    let outcome = state.handler().file_uploaded(&mut session, file).await?;

    Ok(Json(UploadResponse {
        summarized: outcome.summarized,
        content_chars: outcome.content_chars,
        summary_recorded: outcome.summary_recorded,
        session: session.view(id),
    }))
}
