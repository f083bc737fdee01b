//! Event handlers that drive one session: upload, ask, clear, translate

use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use crate::ingestion::{FileParser, TextChunker};
use crate::providers::{Backends, LlmSummarizer, LlmTranslator, Summarizer, Translator};
use crate::types::{chat::timestamp_now, AskRequest, UploadedFile};

use super::state::SessionState;

/// Content ready to answer over
#[derive(Debug, Clone)]
pub struct ActiveContent {
    /// Raw text, or the combined chunk summaries when it was too long
    pub text: String,
    /// The raw text exceeded the threshold
    pub summarized: bool,
}

/// Result of a file upload
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    /// Content was summarized
    pub summarized: bool,
    /// Characters of content after any summarization
    pub content_chars: usize,
    /// Summary recorded by this upload. `None` when one was already cached.
    pub summary_recorded: Option<String>,
}

/// Result of a submitted question
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskOutcome {
    /// Two turns were appended
    Answered { answer: String, summarized: bool },
    /// Nothing was asked and the session is unchanged
    Skipped(SkipReason),
}

/// Why a question was not sent to a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No file uploaded yet
    NoFile,
    /// Blank question
    EmptyQuestion,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFile => write!(f, "Upload a file before asking a question"),
            Self::EmptyQuestion => write!(f, "Question is empty"),
        }
    }
}

/// Shared, stateless handler. Session state is passed in per event.
pub struct InteractionHandler {
    backends: Backends,
    summarizer: Arc<dyn Summarizer>,
    translator: Arc<dyn Translator>,
    chunker: TextChunker,
    threshold_chars: usize,
    clock: fn() -> String,
}

impl InteractionHandler {
    /// Create a handler from explicit collaborators
    pub fn new(
        backends: Backends,
        summarizer: Arc<dyn Summarizer>,
        translator: Arc<dyn Translator>,
        chunker: TextChunker,
        threshold_chars: usize,
    ) -> Self {
        Self {
            backends,
            summarizer,
            translator,
            chunker,
            threshold_chars,
            clock: timestamp_now,
        }
    }

    /// Build backends, summarizer and translator from configuration
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let backends = Backends::from_config(config)?;
        let summarizer = Arc::new(LlmSummarizer::new(Arc::clone(
            backends.get(config.summarizer.model),
        )));
        let translator = Arc::new(LlmTranslator::new(
            Arc::clone(backends.get(config.translator.model)),
            config.translator.target_language.clone(),
        ));

        Ok(Self::new(
            backends,
            summarizer,
            translator,
            TextChunker::from_config(&config.chunking),
            config.summarizer.threshold_chars,
        ))
    }

    /// Replace the timestamp source
    pub fn with_clock(mut self, clock: fn() -> String) -> Self {
        self.clock = clock;
        self
    }

    /// Backends used for answering
    pub fn backends(&self) -> &Backends {
        &self.backends
    }

    /// Target language of the translate action
    pub fn translation_language(&self) -> &str {
        self.translator.language()
    }

    /// Extract the file's text and summarize it when over the threshold
    pub async fn active_content(&self, file: &UploadedFile) -> Result<ActiveContent> {
        let parsed = FileParser::extract_content(file).await?;
        let chars = parsed.char_count();

        if chars <= self.threshold_chars {
            return Ok(ActiveContent {
                text: parsed.content,
                summarized: false,
            });
        }

        let chunks = self.chunker.split_text(&parsed.content);
        tracing::info!(
            "{} has {} characters (limit {}), summarizing {} chunks",
            file.filename,
            chars,
            self.threshold_chars,
            chunks.len()
        );
        let text = self.summarizer.summarize_chunks(&chunks).await?;

        Ok(ActiveContent {
            text,
            summarized: true,
        })
    }

    /// A file was uploaded. On failure the session is left unchanged.
    pub async fn file_uploaded(
        &self,
        state: &mut SessionState,
        file: UploadedFile,
    ) -> Result<UploadOutcome> {
        let content = self.active_content(&file).await?;
        let summary_recorded = state
            .record_cached_summary(&content.text)
            .then(|| state.file_summary().to_string());

        tracing::info!(
            "Stored upload {} ({} bytes, summarized: {})",
            file.filename,
            file.size(),
            content.summarized
        );
        state.set_upload(file);

        Ok(UploadOutcome {
            summarized: content.summarized,
            content_chars: content.text.chars().count(),
            summary_recorded,
        })
    }

    /// A question was submitted
    pub async fn question_submitted(
        &self,
        state: &mut SessionState,
        request: &AskRequest,
    ) -> Result<AskOutcome> {
        let Some(file) = state.upload() else {
            return Ok(AskOutcome::Skipped(SkipReason::NoFile));
        };

        let content = self.active_content(file).await?;
        state.record_cached_summary(&content.text);

        if request.question.is_empty() {
            return Ok(AskOutcome::Skipped(SkipReason::EmptyQuestion));
        }

        let prompt = request.style.effective_prompt(&request.question);
        let backend = self.backends.get(request.model);
        tracing::info!(
            "Answering with {} ({}), style {:?}",
            backend.name(),
            backend.model(),
            request.style
        );

        let answer = backend.answer(&prompt, &content.text).await?;

        let timestamp = (self.clock)();
        state
            .transcript_mut()
            .record_exchange(&timestamp, &request.question, &answer);

        Ok(AskOutcome::Answered {
            answer,
            summarized: content.summarized,
        })
    }

    /// Clear chat was clicked
    pub fn clear_clicked(&self, state: &mut SessionState) {
        state.reset_transcript();
    }

    /// Translate was clicked. The transcript is never modified.
    pub async fn translate_clicked(&self, state: &SessionState) -> Result<String> {
        let message = state
            .transcript()
            .last_bot_message()
            .ok_or(Error::NothingToTranslate)?;
        self.translator.translate(message).await
    }
}
