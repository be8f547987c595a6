//! Configuration module for Tolk.
//!
//! Handles loading and managing application settings.

mod settings;

pub use settings::{
    AgentSettings, GeneralSettings, InferenceSettings, McpSettings, RagSettings, ServerSettings,
    Settings,
};
