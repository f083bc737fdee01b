//! Configuration for the file chat service

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};
use crate::types::ModelChoice;

/// Environment variable holding the Gemini API key
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";
/// Environment variable overriding the Ollama base URL
pub const OLLAMA_BASE_URL_ENV: &str = "OLLAMA_BASE_URL";

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Hosted model (Gemini) configuration
    pub gemini: GeminiConfig,
    /// Local model (Ollama) configuration
    pub local_model: LocalModelConfig,
    /// Chunking configuration for oversized content
    pub chunking: ChunkingConfig,
    /// Summarizer configuration
    pub summarizer: SummarizerConfig,
    /// Translator configuration
    pub translator: TranslatorConfig,
    /// Session lifecycle configuration
    pub session: SessionConfig,
}

impl ChatConfig {
    /// Load configuration from a TOML file. Missing sections use defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Load from an optional file, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(key) = lookup(GEMINI_API_KEY_ENV).filter(|k| !k.trim().is_empty()) {
            self.gemini.api_key = Some(key);
        }
        if let Some(url) = lookup(OLLAMA_BASE_URL_ENV).filter(|u| !u.trim().is_empty()) {
            self.local_model.base_url = url;
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// Hosted Gemini configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key; usually supplied through `GEMINI_API_KEY`
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
    /// Generative Language API base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Maximum output tokens
    pub max_output_tokens: u32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-2.0-flash".to_string(),
            temperature: 0.3,
            max_output_tokens: 2048,
            timeout_secs: 120,
        }
    }
}

/// Local model (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalModelConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Generation model name
    pub model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
    /// Context passed to the model is cut to this many characters
    pub context_char_limit: Option<usize>,
}

impl Default for LocalModelConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "phi3".to_string(), // Fast 3.8B model for CPU
            temperature: 0.3,
            timeout_secs: 120,
            max_retries: 2,
            context_char_limit: Some(12_000), // phi3 4k context
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target chunk size in characters
    pub chunk_size: usize,
    /// Overlap between chunks in characters
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 4000,
            chunk_overlap: 200,
        }
    }
}

/// Summarization of oversized content
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    /// Content longer than this many characters is summarized
    pub threshold_chars: usize,
    /// Backend that condenses each chunk
    pub model: ModelChoice,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            threshold_chars: 50_000,
            model: ModelChoice::Slm,
        }
    }
}

/// Translation of bot answers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslatorConfig {
    /// Target language name given to the model
    pub target_language: String,
    /// Backend that performs the translation
    pub model: ModelChoice,
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            target_language: "Hindi".to_string(),
            model: ModelChoice::Gemini,
        }
    }
}

/// Session lifecycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Characters of content kept in the file summary
    pub summary_chars: usize,
    /// Idle sessions are dropped after this many seconds
    pub idle_ttl_secs: u64,
    /// How often the idle sweeper runs
    pub sweep_interval_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            summary_chars: 500,
            idle_ttl_secs: 60 * 60,
            sweep_interval_secs: 60,
        }
    }
}
