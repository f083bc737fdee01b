//! Response types for session interactions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::chat::ChatTurn;
use super::document::FileType;

/// What the page renders for a session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionView {
    /// Session ID
    pub session_id: Uuid,
    /// Currently uploaded file
    pub file: Option<FileInfo>,
    /// Cached summary of the first file (empty until recorded)
    pub file_summary: String,
    /// Transcript in chronological order
    pub turns: Vec<ChatTurn>,
    /// Download link is offered
    pub export_available: bool,
    /// Translate action is offered
    pub can_translate: bool,
}

/// Uploaded file metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Original file name
    pub filename: String,
    /// Detected type
    pub file_type: FileType,
    /// Size in bytes
    pub size_bytes: usize,
}

/// Result of a file upload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Extracted content exceeded the threshold and was summarized
    pub summarized: bool,
    /// Characters of content after any summarization
    pub content_chars: usize,
    /// Summary recorded by this upload, if the cache was still empty
    pub summary_recorded: Option<String>,
    /// Refreshed view
    pub session: SessionView,
}

/// Result of a submitted question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskResponse {
    /// Answer text, absent when the question was skipped
    pub answer: Option<String>,
    /// Why the question was not answered
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
    /// Content was summarized before answering
    pub summarized: bool,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Refreshed view
    pub session: SessionView,
}

/// Result of the translate action
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    /// Target language name
    pub language: String,
    /// Translated text of the last bot answer
    pub translation: String,
}
