//! Request types for session interactions

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Literal suffix appended to the question in detailed mode
pub const DETAILED_SUFFIX: &str = "\nPlease provide a detailed explanation.";

/// Which answer backend handles a question
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelChoice {
    /// Hosted large model (Gemini)
    #[default]
    Gemini,
    /// Small model running locally (Ollama)
    Slm,
}

impl ModelChoice {
    /// Label shown in the model selector
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Gemini => "Gemini (LLM)",
            Self::Slm => "SLM (Local Model)",
        }
    }
}

impl std::fmt::Display for ModelChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::Slm => write!(f, "slm"),
        }
    }
}

/// Answer style selector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStyle {
    /// Question is sent unmodified
    #[default]
    Simple,
    /// Question is sent with a request for a detailed explanation
    Detailed,
}

impl AnswerStyle {
    /// Build the prompt actually sent to the backend
    pub fn effective_prompt(&self, question: &str) -> String {
        match self {
            Self::Simple => question.to_string(),
            Self::Detailed => format!("{}{}", question, DETAILED_SUFFIX),
        }
    }
}

/// POST /api/sessions/:id/ask body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskRequest {
    /// The question typed by the user
    #[serde(default)]
    pub question: String,

    /// Selected backend (default: gemini)
    #[serde(default)]
    pub model: ModelChoice,

    /// Selected answer style (default: simple)
    #[serde(default)]
    pub style: AnswerStyle,
}

impl AskRequest {
    /// Create a request with default model and style
    pub fn new(question: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            model: ModelChoice::default(),
            style: AnswerStyle::default(),
        }
    }

    /// Set the backend
    pub fn with_model(mut self, model: ModelChoice) -> Self {
        self.model = model;
        self
    }

    /// Set the answer style
    pub fn with_style(mut self, style: AnswerStyle) -> Self {
        self.style = style;
        self
    }
}

/// POST /api/sessions body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OpenSessionRequest {
    /// Resume this session if it still exists
    #[serde(default)]
    pub session_id: Option<Uuid>,
}
