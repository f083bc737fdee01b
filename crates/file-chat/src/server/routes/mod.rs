//! API routes for the file chat server

pub mod ask;
pub mod chat;
pub mod session;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};
use crate::server::state::AppState;
use crate::types::{FileType, ModelChoice};

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Session lifecycle
        .route("/sessions", post(session::open_session))
        .route(
            "/sessions/:id",
            get(session::get_session).delete(session::close_session),
        )
        // Upload - with larger body limit for files
        .route(
            "/sessions/:id/upload",
            post(upload::upload_file).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Question answering
        .route("/sessions/:id/ask", post(ask::ask_question))
        // Transcript actions
        .route("/sessions/:id/clear", post(chat::clear_chat))
        .route("/sessions/:id/export", get(chat::export_chat))
        .route("/sessions/:id/translate", post(chat::translate_last))
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let handler = state.handler();
    let backends = handler.backends();
    let models: Vec<_> = [ModelChoice::Gemini, ModelChoice::Slm]
        .into_iter()
        .map(|choice| {
            serde_json::json!({
                "id": choice,
                "label": choice.display_name(),
                "model": backends.get(choice).model(),
            })
        })
        .collect();

    Json(serde_json::json!({
        "name": "file-chat",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Ask questions about an uploaded file with a hosted or local model",
        "accepted_extensions": FileType::ACCEPTED_EXTENSIONS,
        "models": models,
        "translation_language": handler.translation_language(),
        "active_sessions": state.registry().len(),
        "endpoints": {
            "POST /api/sessions": "Open or resume a session",
            "GET /api/sessions/:id": "Session view",
            "DELETE /api/sessions/:id": "End a session",
            "POST /api/sessions/:id/upload": "Upload a file (multipart)",
            "POST /api/sessions/:id/ask": "Ask a question about the file",
            "POST /api/sessions/:id/clear": "Clear the chat transcript",
            "GET /api/sessions/:id/export": "Download chat_history.txt",
            "POST /api/sessions/:id/translate": "Translate the last bot answer"
        }
    }))
}
