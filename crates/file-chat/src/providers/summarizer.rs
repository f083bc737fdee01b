//! Chunk summarization for content too large to answer over directly

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::generation::PromptBuilder;

use super::llm::AnswerBackend;

/// Condenses a sequence of chunks into one shorter text
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Summarize chunks in order and return the combined text
    async fn summarize_chunks(&self, chunks: &[String]) -> Result<String>;
}

/// Summarizer that asks a model backend to condense each chunk
pub struct LlmSummarizer {
    backend: Arc<dyn AnswerBackend>,
}

impl LlmSummarizer {
    /// Create a summarizer over a backend
    pub fn new(backend: Arc<dyn AnswerBackend>) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize_chunks(&self, chunks: &[String]) -> Result<String> {
        tracing::info!(
            "Summarizing {} chunks with {} ({})",
            chunks.len(),
            self.backend.name(),
            self.backend.model()
        );

        let mut partials = Vec::with_capacity(chunks.len());
        for (i, chunk) in chunks.iter().enumerate() {
            let summary = self
                .backend
                .generate(&PromptBuilder::build_summary_prompt(chunk))
                .await
                .map_err(|e| Error::summarization(format!("chunk {}: {}", i + 1, e)))?;
            partials.push(summary.trim().to_string());
        }

        Ok(partials.join("\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FirstLine;

    #[async_trait]
    impl AnswerBackend for FirstLine {
        async fn generate(&self, prompt: &str) -> Result<String> {
            // The chunk is the line after "TEXT:"
            let chunk = prompt.split("TEXT:\n").nth(1).unwrap_or("");
            let first = chunk.lines().next().unwrap_or("");
            if first == "boom" {
                return Err(Error::llm("model crashed"));
            }
            Ok(format!(" {} \n", first))
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "first-line"
        }

        fn model(&self) -> &str {
            "test"
        }
    }

    #[tokio::test]
    async fn test_summaries_joined_in_order() {
        let summarizer = LlmSummarizer::new(Arc::new(FirstLine));
        let chunks = vec!["one\nmore".to_string(), "two".to_string(), "three".to_string()];
        assert_eq!(summarizer.summarize_chunks(&chunks).await.unwrap(), "one\ntwo\nthree");
    }

    #[tokio::test]
    async fn test_failure_is_summarization_error() {
        let summarizer = LlmSummarizer::new(Arc::new(FirstLine));
        let chunks = vec!["ok".to_string(), "boom".to_string()];
        let err = summarizer.summarize_chunks(&chunks).await.unwrap_err();
        assert!(matches!(err, Error::Summarization(_)));
        assert!(err.to_string().contains("chunk 2"));
    }
}
