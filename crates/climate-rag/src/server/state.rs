//! Application state for the Q&A server

use parking_lot::RwLock;
use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::providers::{EmbeddingProvider, LlmProvider, OpenAiClient};
use crate::session::SessionStore;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: RagConfig,
    /// Embedding provider (hosted API)
    embedding_provider: Arc<dyn EmbeddingProvider>,
    /// LLM provider (hosted API)
    llm_provider: Arc<dyn LlmProvider>,
    /// Live sessions
    sessions: SessionStore,
    /// Ready state
    ready: RwLock<bool>,
}

impl AppState {
    /// Create new application state.
    ///
    /// Fails when the API credential is missing: nothing downstream can
    /// work without it, so startup stops here.
    pub fn new(config: RagConfig) -> Result<Self> {
        config.require_api_key()?;

        tracing::info!("Initializing application state...");

        let client = Arc::new(OpenAiClient::new(&config.openai)?);
        tracing::info!(
            "OpenAI client initialized (chat: {}, embeddings: {})",
            config.openai.chat_model,
            config.openai.embed_model
        );

        std::fs::create_dir_all(&config.storage.upload_dir)?;
        std::fs::create_dir_all(&config.storage.export_dir)?;

        let sessions = SessionStore::new(config.access.password.clone());
        if sessions.gated() {
            tracing::info!("Access gate enabled: sessions start locked");
        }

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                embedding_provider: client.clone(),
                llm_provider: client,
                sessions,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the embedding provider
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.inner.embedding_provider
    }

    /// Get the LLM provider
    pub fn llm_provider(&self) -> &Arc<dyn LlmProvider> {
        &self.inner.llm_provider
    }

    /// Get the session store
    pub fn sessions(&self) -> &SessionStore {
        &self.inner.sessions
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn state_construction_halts_without_a_credential() {
        // No key in the config: nothing is built, no directory is touched.
        let config = RagConfig::default();
        assert!(matches!(AppState::new(config), Err(Error::Config(_))));
    }
}
