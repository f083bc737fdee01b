//! Answer backend trait and the model selector that dispatches to it

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::types::ModelChoice;

use super::gemini::GeminiClient;
use super::ollama::OllamaClient;

/// Trait for model-backed text generation
///
/// Implementations:
/// - `GeminiClient`: hosted Gemini via the Generative Language API
/// - `OllamaClient`: small model on a local Ollama server
#[async_trait]
pub trait AnswerBackend: Send + Sync {
    /// Send a fully built prompt and return the model's text
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Answer `prompt` about `context` (the file content)
    async fn answer(&self, prompt: &str, context: &str) -> Result<String> {
        self.generate(&PromptBuilder::build_answer_prompt(prompt, context))
            .await
    }

    /// Check if the backend is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get backend name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// One backend per selectable model
#[derive(Clone)]
pub struct Backends {
    gemini: Arc<dyn AnswerBackend>,
    slm: Arc<dyn AnswerBackend>,
}

impl Backends {
    /// Create from explicit backends
    pub fn new(gemini: Arc<dyn AnswerBackend>, slm: Arc<dyn AnswerBackend>) -> Self {
        Self { gemini, slm }
    }

    /// Build the Gemini and Ollama clients from configuration
    pub fn from_config(config: &ChatConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        let slm = Arc::new(OllamaClient::new(&config.local_model)?);
        Ok(Self::new(gemini, slm))
    }

    /// Backend for a model selection
    pub fn get(&self, choice: ModelChoice) -> &Arc<dyn AnswerBackend> {
        match choice {
            ModelChoice::Gemini => &self.gemini,
            ModelChoice::Slm => &self.slm,
        }
    }

    /// Health of every backend
    pub async fn health(&self) -> Vec<(ModelChoice, bool)> {
        let mut report = Vec::with_capacity(2);
        for choice in [ModelChoice::Gemini, ModelChoice::Slm] {
            let healthy = self.get(choice).health_check().await.unwrap_or(false);
            report.push((choice, healthy));
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Named(&'static str);

    #[async_trait]
    impl AnswerBackend for Named {
        async fn generate(&self, prompt: &str) -> Result<String> {
            Ok(format!("{}:{}", self.0, prompt.len()))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(self.0 == "gemini")
        }

        fn name(&self) -> &str {
            self.0
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    fn backends() -> Backends {
        Backends::new(Arc::new(Named("gemini")), Arc::new(Named("slm")))
    }

    #[test]
    fn test_dispatch_by_choice() {
        let backends = backends();
        assert_eq!(backends.get(ModelChoice::Gemini).name(), "gemini");
        assert_eq!(backends.get(ModelChoice::Slm).name(), "slm");
    }

    #[tokio::test]
    async fn test_default_answer_wraps_prompt() {
        let backend = Named("slm");
        let expected = PromptBuilder::build_answer_prompt("q", "ctx").len();
        assert_eq!(backend.answer("q", "ctx").await.unwrap(), format!("slm:{}", expected));
    }

    #[tokio::test]
    async fn test_health_report() {
        let report = backends().health().await;
        assert_eq!(report, vec![(ModelChoice::Gemini, true), (ModelChoice::Slm, false)]);
    }
}
