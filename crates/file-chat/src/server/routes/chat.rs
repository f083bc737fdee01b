//! Transcript actions: clear, export and translate

use axum::{
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{SessionView, TranslateResponse, EXPORT_FILENAME};

/// POST /api/sessions/:id/clear - Empty the transcript
pub async fn clear_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let handle = state.registry().get(&id)?;
    let mut session = handle.lock().await;
    state.handler().clear_clicked(&mut session);
    Ok(Json(session.view(id)))
}

/// GET /api/sessions/:id/export - Download the transcript as text
pub async fn export_chat(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let handle = state.registry().get(&id)?;
    let session = handle.lock().await;
    if session.transcript().is_empty() {
        return Err(Error::NothingToExport);
    }

    let body = session.transcript().export_text();
    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    ))
}

/// POST /api/sessions/:id/translate - Translate the last bot answer
pub async fn translate_last(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<TranslateResponse>> {
    let handle = state.registry().get(&id)?;
    let session = handle.lock().await;
    let handler = state.handler();
    let translation = handler.translate_clicked(&session).await?;

    Ok(Json(TranslateResponse {
        language: handler.translation_language().to_string(),
        translation,
    }))
}
