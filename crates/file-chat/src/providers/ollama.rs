//! Local small-model client for Ollama with retry logic

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::config::LocalModelConfig;
use crate::error::{Error, Result};
use crate::generation::{truncate_chars, PromptBuilder};

use super::llm::AnswerBackend;

/// Ollama API client with automatic retry
pub struct OllamaClient {
    /// HTTP client
    client: Client,
    /// Configuration
    config: LocalModelConfig,
    /// Base delay between retries, doubled per attempt
    retry_base_delay: Duration,
}

#[derive(Serialize)]
struct GenerateRequest {
    model: String,
    prompt: String,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

impl OllamaClient {
    /// Create a new Ollama client with retry support
    pub fn new(config: &LocalModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config: config.clone(),
            retry_base_delay: Duration::from_secs(1),
        })
    }

    /// Override the retry base delay
    pub fn with_retry_base_delay(mut self, delay: Duration) -> Self {
        self.retry_base_delay = delay;
        self
    }

    /// Retry a request with exponential backoff
    async fn retry_request<F, Fut, T>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let max_retries = self.config.max_retries;
        let mut last_error = None;

        for attempt in 0..=max_retries {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    if attempt < max_retries {
                        let delay = self
                            .retry_base_delay
                            .saturating_mul(2u32.saturating_pow(attempt));
                        tracing::warn!(
                            "Ollama request failed (attempt {}/{}): {}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            e,
                            delay
                        );
                        sleep(delay).await;
                    }
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| Error::llm("Unknown error")))
    }
}

#[async_trait]
impl AnswerBackend for OllamaClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/api/generate", self.config.base_url.trim_end_matches('/'));
        let model = self.config.model.clone();
        let temperature = self.config.temperature;

        tracing::info!("Generating answer with local model: {}", model);

        self.retry_request(|| {
            let request = GenerateRequest {
                model: model.clone(),
                prompt: prompt.to_string(),
                stream: false,
                options: GenerateOptions { temperature },
            };
            let client = self.client.clone();
            let url = url.clone();

            async move {
                let response = client
                    .post(&url)
                    .json(&request)
                    .send()
                    .await
                    .map_err(|e| Error::llm(format!("Generation request failed: {}", e)))?;

                if !response.status().is_success() {
                    let status = response.status();
                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::llm(format!(
                        "Generation failed: HTTP {} - {}",
                        status, body
                    )));
                }

                let generate_response: GenerateResponse = response.json().await.map_err(|e| {
                    Error::llm(format!("Failed to parse generation response: {}", e))
                })?;

                Ok(generate_response.response)
            }
        })
        .await
    }

    async fn answer(&self, prompt: &str, context: &str) -> Result<String> {
        let context = match self.config.context_char_limit {
            Some(limit) => {
                let cut = truncate_chars(context, limit);
                if cut.len() < context.len() {
                    tracing::debug!("Context cut to {} characters for local model", limit);
                }
                cut
            }
            None => context,
        };

        self.generate(&PromptBuilder::build_answer_prompt(prompt, context))
            .await
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/api/tags", self.config.base_url.trim_end_matches('/'));

        match self.client.get(&url).send().await {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    fn name(&self) -> &str {
        "ollama"
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
    use serde_json::{json, Value};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    #[derive(Clone)]
    struct Fake {
        /// Requests to fail before succeeding
        failures: u32,
        calls: Arc<AtomicU32>,
        last_prompt: Arc<parking_lot::Mutex<String>>,
    }

    async fn fake_generate(
        State(fake): State<Fake>,
        Json(body): Json<Value>,
    ) -> (StatusCode, Json<Value>) {
        let call = fake.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(body["stream"], false);
        if call < fake.failures {
            return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({"error": "loading"})));
        }
        *fake.last_prompt.lock() = body["prompt"].as_str().unwrap_or("").to_string();
        (
            StatusCode::OK,
            Json(json!({"model": body["model"], "response": "local answer", "done": true})),
        )
    }

    async fn spawn_fake(failures: u32) -> (String, Fake) {
        let fake = Fake {
            failures,
            calls: Arc::new(AtomicU32::new(0)),
            last_prompt: Arc::new(parking_lot::Mutex::new(String::new())),
        };
        let app = Router::new()
            .route("/api/generate", post(fake_generate))
            .route("/api/tags", get(|| async { Json(json!({"models": []})) }))
            .with_state(fake.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{}", addr), fake)
    }

    fn client(base_url: String, max_retries: u32, limit: Option<usize>) -> OllamaClient {
        let config = LocalModelConfig {
            base_url,
            max_retries,
            context_char_limit: limit,
            ..LocalModelConfig::default()
        };
        OllamaClient::new(&config)
            .unwrap()
            .with_retry_base_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_generate() {
        let (base, fake) = spawn_fake(0).await;
        let client = client(base, 0, None);
        assert_eq!(client.generate("hi").await.unwrap(), "local answer");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 1);
        assert!(client.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_retries_then_succeeds() {
        let (base, fake) = spawn_fake(2).await;
        let client = client(base, 2, None);
        assert_eq!(client.generate("hi").await.unwrap(), "local answer");
        assert_eq!(fake.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_retries() {
        let (base, fake) = spawn_fake(5).await;
        let client = client(base, 1, None);
        let err = client.generate("hi").await.unwrap_err();
        assert!(matches!(err, Error::Llm(_)));
        assert_eq!(fake.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_answer_truncates_context() {
        let (base, fake) = spawn_fake(0).await;
        let client = client(base, 0, Some(5));
        client.answer("Q?", "abcdefghij").await.unwrap();

        let prompt = fake.last_prompt.lock().clone();
        assert!(prompt.contains("FILE CONTENT:\nabcde\n"));
        assert!(!prompt.contains("abcdef"));
    }

    #[tokio::test]
    async fn test_backoff_saturates_with_many_retries() {
        let (base, fake) = spawn_fake(100).await;
        let client = client(base, 40, None).with_retry_base_delay(Duration::ZERO);
        assert!(client.generate("hi").await.is_err());
        assert_eq!(fake.calls.load(Ordering::SeqCst), 41);
    }

    #[tokio::test]
    async fn test_unreachable_is_unhealthy() {
        let client = client("http://127.0.0.1:9".to_string(), 0, None);
        assert!(!client.health_check().await.unwrap());
        assert!(client.generate("hi").await.is_err());
    }
}
