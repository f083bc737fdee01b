//! Translation of bot answers

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::llm::AnswerBackend;

/// Translates text into a fixed target language
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `text`
    async fn translate(&self, text: &str) -> Result<String>;

    /// Target language name
    fn language(&self) -> &str;
}

/// Translator backed by a model
pub struct LlmTranslator {
    backend: Arc<dyn AnswerBackend>,
    language: String,
}

impl LlmTranslator {
    /// Create a translator into `language`
    pub fn new(backend: Arc<dyn AnswerBackend>, language: impl Into<String>) -> Self {
        Self {
            backend,
            language: language.into(),
        }
    }
}

#[async_trait]
impl Translator for LlmTranslator {
    async fn translate(&self, text: &str) -> Result<String> {
        tracing::info!("Translating {} characters to {}", text.chars().count(), self.language);

        let translated = self
            .backend
            .generate(&PromptBuilder::build_translation_prompt(text, &self.language))
            .await
            .map_err(|e| Error::translation(e.to_string()))?;

        Ok(translated.trim().to_string())
    }

    fn language(&self) -> &str {
        &self.language
    }
}
