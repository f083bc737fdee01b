//! Application state for the file chat server

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;

use crate::config::ChatConfig;
use crate::error::Result;
use crate::session::{InteractionHandler, SessionRegistry};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: ChatConfig,
    /// Open sessions
    registry: Arc<SessionRegistry>,
    /// Event handlers and their collaborators
    handler: InteractionHandler,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state with backends built from configuration
    pub fn new(config: ChatConfig) -> Result<Self> {
        tracing::info!(
            "Initializing file chat state (gemini: {}, local: {} at {})",
            config.gemini.model,
            config.local_model.model,
            config.local_model.base_url
        );
        let handler = InteractionHandler::from_config(&config)?;
        Ok(Self::with_handler(config, handler))
    }

    /// Create with an explicit handler
    pub fn with_handler(config: ChatConfig, handler: InteractionHandler) -> Self {
        let registry = Arc::new(SessionRegistry::new(config.session.summary_chars));
        Self {
            inner: Arc::new(AppStateInner {
                config,
                registry,
                handler,
                ready: RwLock::new(true),
            }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &ChatConfig {
        &self.inner.config
    }

    /// Session registry
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.inner.registry
    }

    /// Event handler
    pub fn handler(&self) -> &InteractionHandler {
        &self.inner.handler
    }

    /// Check if ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }

    /// Idle TTL from configuration
    pub fn idle_ttl(&self) -> Duration {
        Duration::from_secs(self.inner.config.session.idle_ttl_secs)
    }
}
