//! Typed HTTP client for a Llama Stack server.
//!
//! Covers the slice of the API the harness drives: chat-completion
//! inference, vector database registration, RAG document ingestion,
//! toolgroup registration, and agent/session/turn management. The
//! client is constructed once per process and passed explicitly.

mod agents;
mod events;
mod inference;
mod toolgroups;
mod vector_dbs;

pub use agents::{AgentConfig, AgentToolgroup, SamplingParams};
pub use events::{TurnLogger, TurnStreamChunk};
pub use inference::{StackChat, ToolDef, ToolParamDefinition};
pub use vector_dbs::{RagDocument, VectorDbInfo};
pub use toolgroups::{McpEndpoint, ToolgroupInfo};

use crate::error::{Result, TolkError};
use std::time::Duration;
use url::Url;

/// Default timeout for Llama Stack requests. Local model servers can be
/// slow to first token, so this is deliberately generous.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// HTTP client bound to one Llama Stack server.
pub struct StackClient {
    http: reqwest::Client,
    base_url: Url,
}

impl StackClient {
    /// Create a client with the default timeout.
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url })
    }

    /// The server this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Turn a non-2xx response into a `Stack` error carrying the body.
    pub(crate) async fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        Err(TolkError::Stack(format!("{} {}: {}", status, path, body)))
    }
}
