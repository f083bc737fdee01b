//! Per-session context: transcript, file summary cache and current upload

use uuid::Uuid;

use crate::types::{FileInfo, SessionView, Transcript, UploadedFile};

/// Marker appended to the cached file summary
pub const SUMMARY_ELLIPSIS: &str = "...";

/// State owned by one browser session
#[derive(Debug, Clone)]
pub struct SessionState {
    transcript: Transcript,
    file_summary: String,
    upload: Option<UploadedFile>,
    summary_chars: usize,
}

impl SessionState {
    /// Fresh session keeping `summary_chars` characters in the file summary
    pub fn new(summary_chars: usize) -> Self {
        Self {
            transcript: Transcript::new(),
            file_summary: String::new(),
            upload: None,
            summary_chars,
        }
    }

    /// Transcript so far
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub(crate) fn transcript_mut(&mut self) -> &mut Transcript {
        &mut self.transcript
    }

    /// Clear the transcript. The file summary is kept.
    pub fn reset_transcript(&mut self) {
        self.transcript.clear();
    }

    /// Cached summary, empty until the first file is seen
    pub fn file_summary(&self) -> &str {
        &self.file_summary
    }

    /// Cache the head of `content` as the file summary if none is cached yet.
    ///
    /// Returns true when this call set the cache. Later files never replace it.
    pub fn record_cached_summary(&mut self, content: &str) -> bool {
        if !self.file_summary.is_empty() {
            return false;
        }

        let head: String = content.chars().take(self.summary_chars).collect();
        self.file_summary = format!("{}{}", head, SUMMARY_ELLIPSIS);
        true
    }

    /// Currently uploaded file
    pub fn upload(&self) -> Option<&UploadedFile> {
        self.upload.as_ref()
    }

    /// Replace the current upload
    pub fn set_upload(&mut self, file: UploadedFile) {
        self.upload = Some(file);
    }

    /// Translate is offered only right after a bot answer
    pub fn can_translate(&self) -> bool {
        self.transcript.last_bot_message().is_some()
    }

    /// Snapshot for rendering
    pub fn view(&self, session_id: Uuid) -> SessionView {
        SessionView {
            session_id,
            file: self.upload.as_ref().map(|f| FileInfo {
                filename: f.filename.clone(),
                file_type: f.file_type,
                size_bytes: f.size(),
            }),
            file_summary: self.file_summary.clone(),
            turns: self.transcript.turns().to_vec(),
            export_available: !self.transcript.is_empty(),
            can_translate: self.can_translate(),
        }
    }
}
