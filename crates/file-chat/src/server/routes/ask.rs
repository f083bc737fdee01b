//! Question endpoint

use axum::{
    extract::{Path, State},
    Json,
};
use std::time::Instant;
use uuid::Uuid;

use crate::error::Result;
use crate::server::state::AppState;
use crate::session::AskOutcome;
use crate::types::{AskRequest, AskResponse};

/// POST /api/sessions/:id/ask - Answer a question about the uploaded file
pub async fn ask_question(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>> {
    let start = Instant::now();
    let handle = state.registry().get(&id)?;

    let mut session = handle.lock().await;
    let outcome = state
        .handler()
        .question_submitted(&mut session, &request)
        .await?;
    let processing_time_ms = start.elapsed().as_millis() as u64;

    let (answer, skipped, summarized) = match outcome {
        AskOutcome::Answered { answer, summarized } => {
            tracing::info!(
                "Session {}: answered with {} in {}ms",
                id,
                request.model,
                processing_time_ms
            );
            (Some(answer), None, summarized)
        }
        AskOutcome::Skipped(reason) => {
            tracing::debug!("Session {}: question skipped ({})", id, reason);
            (None, Some(reason.to_string()), false)
        }
    };

    Ok(Json(AskResponse {
        answer,
        skipped,
        summarized,
        processing_time_ms,
        session: session.view(id),
    }))
}
