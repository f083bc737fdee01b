//! Model-backed collaborators: answer backends, summarizer and translator
//!
//! Every collaborator goes through the `AnswerBackend` capability so the
//! hosted and local models are interchangeable.

pub mod gemini;
pub mod llm;
pub mod ollama;
pub mod summarizer;
pub mod translator;

pub use gemini::GeminiClient;
pub use llm::{AnswerBackend, Backends};
pub use ollama::OllamaClient;
pub use summarizer::{LlmSummarizer, Summarizer};
pub use translator::{LlmTranslator, Translator};
