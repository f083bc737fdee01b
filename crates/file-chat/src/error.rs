//! Error types for the file chat service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

/// Result type alias for file chat operations
pub type Result<T> = std::result::Result<T, Error>;

/// File chat errors
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// File parsing error
    #[error("Failed to parse file '{filename}': {message}")]
    FileParse { filename: String, message: String },

    /// Unsupported file type
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Chunking or condensation of oversized content failed
    #[error("Summarization failed: {0}")]
    Summarization(String),

    /// Hosted or local model call failed
    #[error("LLM error: {0}")]
    Llm(String),

    /// Translation call failed
    #[error("Translation failed: {0}")]
    Translation(String),

    /// Translate requested while the last turn is not a bot answer
    #[error("There is no bot answer to translate")]
    NothingToTranslate,

    /// Export requested while the transcript is empty
    #[error("The chat transcript is empty")]
    NothingToExport,

    /// Session not found (never opened, torn down or expired)
    #[error("Session not found: {0}")]
    SessionNotFound(Uuid),

    /// Request could not be read
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a file parse error
    pub fn file_parse(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FileParse {
            filename: filename.into(),
            message: message.into(),
        }
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a summarization error
    pub fn summarization(message: impl Into<String>) -> Self {
        Self::Summarization(message.into())
    }

    /// Create a translation error
    pub fn translation(message: impl Into<String>) -> Self {
        Self::Translation(message.into())
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// HTTP status and machine-readable type for this error
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "config_error"),
            Error::FileParse { .. } => (StatusCode::BAD_REQUEST, "parse_error"),
            Error::UnsupportedFileType(_) => (StatusCode::BAD_REQUEST, "unsupported_type"),
            Error::Summarization(_) => (StatusCode::BAD_GATEWAY, "summarization_error"),
            Error::Llm(_) => (StatusCode::SERVICE_UNAVAILABLE, "llm_error"),
            Error::Translation(_) => (StatusCode::BAD_GATEWAY, "translation_error"),
            Error::NothingToTranslate => (StatusCode::CONFLICT, "nothing_to_translate"),
            Error::NothingToExport => (StatusCode::NOT_FOUND, "nothing_to_export"),
            Error::SessionNotFound(_) => (StatusCode::NOT_FOUND, "session_not_found"),
            Error::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            Error::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "io_error"),
            Error::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, error_type) = self.classify();

        if status.is_server_error() {
            tracing::error!("{}", self);
        } else {
            tracing::debug!("{}", self);
        }

        let body = Json(json!({
            "error": {
                "type": error_type,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            Error::UnsupportedFileType("exe".into()).classify().0,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(Error::llm("quota").classify().0, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            Error::SessionNotFound(Uuid::nil()).classify(),
            (StatusCode::NOT_FOUND, "session_not_found")
        );
        assert_eq!(Error::NothingToTranslate.classify().0, StatusCode::CONFLICT);
    }

    #[test]
    fn test_file_parse_message() {
        let err = Error::file_parse("notes.pdf", "no text");
        assert_eq!(err.to_string(), "Failed to parse file 'notes.pdf': no text");
    }
}
