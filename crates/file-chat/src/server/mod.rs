//! HTTP server for the file chat page and API

pub mod routes;
pub mod state;

use axum::{response::Html, routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::ChatConfig;
use crate::error::{Error, Result};
use state::AppState;

/// Single-page UI
const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// File chat HTTP server
pub struct FileChatServer {
    config: ChatConfig,
    state: AppState,
}

impl FileChatServer {
    /// Create a new server with backends built from configuration
    pub fn new(config: ChatConfig) -> Result<Self> {
        let state = AppState::new(config.clone())?;
        Ok(Self { config, state })
    }

    /// Create around existing state
    pub fn with_state(state: AppState) -> Self {
        Self {
            config: state.config().clone(),
            state,
        }
    }

    /// Shared state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let router = Router::new()
            .route("/", get(index))
            // Health check
            .route("/health", get(health_check))
            .route("/ready", get(readiness))
            .nest("/api", routes::api_routes(self.config.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (order matters - applied bottom to top)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.config.server.enable_cors {
            router.layer(
                CorsLayer::new()
                    .allow_origin(Any)
                    .allow_methods(Any)
                    .allow_headers(Any),
            )
        } else {
            router
        }
    }

    /// Start the server and the idle session sweeper
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = self
            .address()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        let sweeper = Arc::clone(self.state.registry()).spawn_sweeper(
            self.state.idle_ttl(),
            Duration::from_secs(self.config.session.sweep_interval_secs.max(1)),
        );

        tracing::info!("Starting file chat server on http://{}", addr);
        tracing::info!("API info: http://{}/api/info", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        let served = axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)));
        sweeper.abort();
        served
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.server.host, self.config.server.port)
    }
}

/// Page endpoint
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Readiness check endpoint
async fn readiness(state: axum::extract::State<AppState>) -> axum::http::StatusCode {
    if state.is_ready() {
        axum::http::StatusCode::OK
    } else {
        axum::http::StatusCode::SERVICE_UNAVAILABLE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result as ChatResult;
    use crate::ingestion::TextChunker;
    use crate::providers::{AnswerBackend, Backends, Summarizer, Translator};
    use crate::session::InteractionHandler;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    struct Canned(&'static str);

    #[async_trait]
    impl AnswerBackend for Canned {
        async fn generate(&self, _prompt: &str) -> ChatResult<String> {
            Ok(self.0.to_string())
        }

        async fn health_check(&self) -> ChatResult<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "canned"
        }

        fn model(&self) -> &str {
            self.0
        }
    }

    struct Joined;

    #[async_trait]
    impl Summarizer for Joined {
        async fn summarize_chunks(&self, chunks: &[String]) -> ChatResult<String> {
            Ok(format!("{} chunks", chunks.len()))
        }
    }

    struct Upper;

    #[async_trait]
    impl Translator for Upper {
        async fn translate(&self, text: &str) -> ChatResult<String> {
            Ok(text.to_uppercase())
        }

        fn language(&self) -> &str {
            "Hindi"
        }
    }

    fn fixed_clock() -> String {
        "12:00:00".to_string()
    }

    fn app() -> Router {
        server().build_router()
    }

    fn server() -> FileChatServer {
        let handler = InteractionHandler::new(
            Backends::new(Arc::new(Canned("It is a test.")), Arc::new(Canned("local"))),
            Arc::new(Joined),
            Arc::new(Upper),
            TextChunker::default(),
            50_000,
        )
        .with_clock(fixed_clock);
        let state = AppState::with_handler(ChatConfig::default(), handler);
        FileChatServer::with_state(state)
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn send_json(app: &Router, method: &str, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, bytes) = send(app, request).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn open(app: &Router) -> String {
        let (status, view) = send_json(app, "POST", "/api/sessions", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::CREATED);
        view["session_id"].as_str().unwrap().to_string()
    }

    fn multipart_upload(uri: &str, filename: &str, content: &str) -> Request<Body> {
        let boundary = "XBOUNDARYX";
        let body = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n{c}\r\n--{b}--\r\n",
            b = boundary,
            f = filename,
            c = content
        );
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", boundary),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_index() {
        let app = app();
        let (status, body) = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, b"OK");

        let (status, body) = send(&app, Request::get("/").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        let page = String::from_utf8_lossy(&body);
        assert!(page.contains("chat_history.txt"));
        assert!(page.contains("Thinking..."));

        let (status, info) = send_json(&app, "GET", "/api/info", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(info["models"][1]["id"], "slm");
    }

    #[tokio::test]
    async fn test_ready_follows_backend_health() {
        let server = server();
        let ready = || Request::get("/ready").body(Body::empty()).unwrap();

        let (status, _) = send(&server.build_router(), ready()).await;
        assert_eq!(status, StatusCode::OK);

        server.state().set_ready(false);
        let (status, _) = send(&server.build_router(), ready()).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_full_conversation() {
        let app = app();
        let id = open(&app).await;

        let (status, body) = send(
            &app,
            multipart_upload(&format!("/api/sessions/{}/upload", id), "a.txt", "0123456789"),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let upload: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(upload["summary_recorded"], "0123456789...");
        assert_eq!(upload["session"]["file"]["filename"], "a.txt");

        let (status, asked) = send_json(
            &app,
            "POST",
            &format!("/api/sessions/{}/ask", id),
            serde_json::json!({"question": "What is this?", "model": "gemini", "style": "simple"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(asked["answer"], "It is a test.");
        assert_eq!(asked["session"]["turns"].as_array().unwrap().len(), 2);
        assert_eq!(asked["session"]["can_translate"], true);

        let export = Request::get(format!("/api/sessions/{}/export", id))
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(export).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"chat_history.txt\""
        );
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(
            &body[..],
            b"You [12:00:00]: What is this?\n\nBot [12:00:00]: It is a test."
        );

        let (status, translated) = send_json(
            &app,
            "POST",
            &format!("/api/sessions/{}/translate", id),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(translated["language"], "Hindi");
        assert_eq!(translated["translation"], "IT IS A TEST.");

        let (status, cleared) = send_json(
            &app,
            "POST",
            &format!("/api/sessions/{}/clear", id),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(cleared["turns"].as_array().unwrap().len(), 0);
        assert_eq!(cleared["file_summary"], "0123456789...");
    }

    #[tokio::test]
    async fn test_export_and_translate_need_turns() {
        let app = app();
        let id = open(&app).await;

        let (status, _) = send(
            &app,
            Request::get(format!("/api/sessions/{}/export", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, err) = send_json(
            &app,
            "POST",
            &format!("/api/sessions/{}/translate", id),
            Value::Null,
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(err["error"]["type"], "nothing_to_translate");
    }

    #[tokio::test]
    async fn test_ask_without_file_is_skipped() {
        let app = app();
        let id = open(&app).await;

        let (status, asked) = send_json(
            &app,
            "POST",
            &format!("/api/sessions/{}/ask", id),
            serde_json::json!({"question": "Anyone there?"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(asked["answer"].is_null());
        assert!(asked["skipped"].is_string());
        assert_eq!(asked["session"]["turns"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_upload_rejected() {
        let app = app();
        let id = open(&app).await;

        let (status, body) = send(
            &app,
            multipart_upload(&format!("/api/sessions/{}/upload", id), "run.exe", "MZ"),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let err: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(err["error"]["type"], "unsupported_type");

        let (_, view) = send_json(&app, "GET", &format!("/api/sessions/{}", id), Value::Null).await;
        assert!(view["file"].is_null());
    }

    #[tokio::test]
    async fn test_session_lifecycle() {
        let app = app();
        let id = open(&app).await;

        let (status, view) = send_json(
            &app,
            "POST",
            "/api/sessions",
            serde_json::json!({"session_id": id}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["session_id"], id.as_str());

        let delete = Request::delete(format!("/api/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&app, delete).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, err) =
            send_json(&app, "GET", &format!("/api/sessions/{}", id), Value::Null).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(err["error"]["type"], "session_not_found");
    }
}
