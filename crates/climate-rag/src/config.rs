//! Configuration for the Q&A service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main service configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// OpenAI API configuration (chat + embeddings)
    pub openai: OpenAiConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Request limits
    pub limits: LimitsConfig,
    /// Local storage configuration
    pub storage: StorageConfig,
    /// Optional access gate
    pub access: AccessConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file if it exists, then apply
    /// environment overrides. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(path)?;
            toml::from_str(&raw)
                .map_err(|e| Error::Config(format!("Invalid config file '{}': {}", path.display(), e)))?
        } else {
            Self::default()
        };

        config.apply_env();
        Ok(config)
    }

    /// Apply environment variable overrides.
    ///
    /// `OPENAI_API_KEY` is the one required input; the `CLIMATE_RAG_*`
    /// variables cover the knobs worth flipping without editing the
    /// config file.
    pub fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            if !key.trim().is_empty() {
                self.openai.api_key = Some(key);
            }
        }
        if let Ok(url) = std::env::var("CLIMATE_RAG_OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Ok(model) = std::env::var("CLIMATE_RAG_CHAT_MODEL") {
            self.openai.chat_model = model;
        }
        if let Ok(host) = std::env::var("CLIMATE_RAG_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("CLIMATE_RAG_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(password) = std::env::var("CLIMATE_RAG_ACCESS_PASSWORD") {
            if !password.is_empty() {
                self.access.password = Some(password);
            }
        }
    }

    /// Fail fast when the API credential is absent or empty.
    ///
    /// Called before the server binds; nothing that needs the upstream API
    /// is constructed without it.
    pub fn require_api_key(&self) -> Result<&str> {
        match self.openai.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => Ok(key),
            _ => Err(Error::Config(
                "OPENAI_API_KEY is missing or empty; set it in the environment or config file"
                    .to_string(),
            )),
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
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024, // 50MB
        }
    }
}

/// OpenAI API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    /// API key. Populated from `OPENAI_API_KEY`; never defaulted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// API base URL
    pub base_url: String,
    /// Chat completion model
    pub chat_model: String,
    /// Embedding model
    pub embed_model: String,
    /// Embedding dimensions (1536 for text-embedding-ada-002)
    pub embedding_dimensions: usize,
    /// Sampling temperature. Zero: answers stay close to the document.
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://api.openai.com/v1".to_string(),
            chat_model: "gpt-3.5-turbo".to_string(),
            embed_model: "text-embedding-ada-002".to_string(),
            embedding_dimensions: 1536,
            temperature: 0.0,
            timeout_secs: 120,
            max_retries: 2,
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
    /// Minimum chunk size (skip smaller chunks)
    pub min_chunk_size: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 1024,
            chunk_overlap: 200,
            min_chunk_size: 50,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of chunks fed into each answer prompt
    pub top_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self { top_k: 4 }
    }
}

/// Request limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum questions per ask request (the UI renders this many slots)
    pub max_questions: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self { max_questions: 40 }
    }
}

/// Local storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for uploaded PDFs. Files accumulate here; nothing prunes it.
    pub upload_dir: PathBuf,
    /// Directory for exported transcripts
    pub export_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let base = dirs::data_local_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
            .join("climate-rag");

        Self {
            upload_dir: base.join("uploads"),
            export_dir: base.join("exports"),
        }
    }
}

/// Optional access gate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Shared password. When set, sessions start locked and must be
    /// unlocked with the exact string before any other route responds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccessConfig {
    /// Whether the gate is active
    pub fn enabled(&self) -> bool {
        self.password.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fix_temperature_and_depth() {
        let config = RagConfig::default();
        assert_eq!(config.openai.temperature, 0.0);
        assert_eq!(config.retrieval.top_k, 4);
        assert_eq!(config.limits.max_questions, 40);
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let config = RagConfig::default();
        assert!(matches!(config.require_api_key(), Err(Error::Config(_))));

        let mut config = RagConfig::default();
        config.openai.api_key = Some("   ".to_string());
        assert!(matches!(config.require_api_key(), Err(Error::Config(_))));

        config.openai.api_key = Some("sk-test".to_string());
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("climate-rag.toml");
        std::fs::write(
            &path,
            r#"
[server]
port = 9090

[retrieval]
top_k = 6

[access]
password = "grenelle"
"#,
        )
        .unwrap();

        let config = RagConfig::load(&path).unwrap();
        assert_eq!(config.server.port, 9090);
        assert_eq!(config.retrieval.top_k, 6);
        assert_eq!(config.access.password.as_deref(), Some("grenelle"));
        // Untouched sections keep their defaults.
        assert_eq!(config.limits.max_questions, 40);
    }

    #[test]
    fn load_without_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = RagConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.server.port, 8080);
    }
}
