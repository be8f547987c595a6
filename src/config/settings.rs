//! Configuration settings for Tolk.

use crate::chat::ToolFailurePolicy;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub server: ServerSettings,
    pub inference: InferenceSettings,
    pub agent: AgentSettings,
    pub rag: RagSettings,
    pub mcp: McpSettings,
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

/// Llama Stack server connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    /// Base URL of the Llama Stack server.
    pub base_url: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8321".to_string(),
            timeout_seconds: 120,
        }
    }
}

/// Inference settings for the tool-calling chat loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InferenceSettings {
    /// Model id to use for chat completion.
    pub model: String,
    /// What to do when a tool handler fails (absorb, propagate).
    pub on_tool_error: ToolFailurePolicy,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            model: "llama3.2".to_string(),
            on_tool_error: ToolFailurePolicy::default(),
        }
    }
}

/// Settings for server-side agents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentSettings {
    /// System instructions for new agents.
    pub instructions: String,
    /// Sampling max_tokens for agent turns.
    pub max_tokens: u32,
    /// Persist agent sessions server-side.
    pub enable_session_persistence: bool,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            instructions: "You are a helpful assistant.".to_string(),
            max_tokens: 2048,
            enable_session_persistence: false,
        }
    }
}

/// RAG (Retrieval-Augmented Generation) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// Embedding model registered with the vector database.
    pub embedding_model: String,
    /// Embedding dimensions.
    pub embedding_dimension: u32,
    /// Vector IO provider id on the server.
    pub provider_id: String,
    /// Chunk size used when ingesting documents.
    pub chunk_size_in_tokens: u32,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            embedding_model: "all-MiniLM-L6-v2".to_string(),
            embedding_dimension: 384,
            provider_id: "milvus".to_string(),
            chunk_size_in_tokens: 200,
        }
    }
}

/// MCP toolgroup settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct McpSettings {
    /// Toolgroup id under which remote MCP servers are registered.
    pub toolgroup_id: String,
    /// Tool runtime provider id on the server.
    pub provider_id: String,
}

impl Default for McpSettings {
    fn default() -> Self {
        Self {
            toolgroup_id: "mcp::demo".to_string(),
            provider_id: "model-context-protocol".to_string(),
        }
    }
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to the default configuration file.
    pub fn save(&self) -> crate::error::Result<()> {
        self.save_to(&Self::default_config_path())
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::TolkError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("tolk")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server.base_url, "http://localhost:8321");
        assert_eq!(settings.rag.embedding_dimension, 384);
        assert_eq!(settings.inference.on_tool_error, ToolFailurePolicy::Absorb);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [inference]
            model = "qwen2.5"
            on_tool_error = "propagate"
            "#,
        )
        .unwrap();
        assert_eq!(settings.inference.model, "qwen2.5");
        assert_eq!(
            settings.inference.on_tool_error,
            ToolFailurePolicy::Propagate
        );
        assert_eq!(settings.server.timeout_seconds, 120);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut settings = Settings::default();
        settings.inference.model = "qwen2.5".to_string();
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.inference.model, "qwen2.5");
    }
}
