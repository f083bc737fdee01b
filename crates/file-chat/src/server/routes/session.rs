//! Session lifecycle endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{OpenSessionRequest, SessionView};

/// POST /api/sessions - Open a session, resuming it when the ID is still live
pub async fn open_session(
    State(state): State<AppState>,
    request: Option<Json<OpenSessionRequest>>,
) -> (StatusCode, Json<SessionView>) {
    let requested = request.and_then(|Json(r)| r.session_id);
    let (id, handle, created) = state.registry().open(requested);
    let view = handle.lock().await.view(id);

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    (status, Json(view))
}

/// GET /api/sessions/:id - Current session view
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>> {
    let handle = state.registry().get(&id)?;
    let view = handle.lock().await.view(id);
    Ok(Json(view))
}

/// DELETE /api/sessions/:id - End a session
pub async fn close_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode> {
    if state.registry().remove(&id) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(Error::SessionNotFound(id))
    }
}
