//! Agent, session, and streaming turn endpoints.

use super::events::TurnStreamChunk;
use super::StackClient;
use crate::chat::Message;
use crate::error::Result;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

/// Sampling parameters for an agent's model.
#[derive(Debug, Clone, Serialize)]
pub struct SamplingParams {
    pub max_tokens: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self { max_tokens: 2048 }
    }
}

/// A toolgroup granted to an agent: either a bare identifier or an
/// identifier with arguments (the RAG knowledge-search tool takes the
/// vector database ids that way).
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AgentToolgroup {
    Name(String),
    WithArgs { name: String, args: Map<String, Value> },
}

impl AgentToolgroup {
    /// The built-in RAG knowledge-search tool over the given vector DBs.
    pub fn knowledge_search(vector_db_ids: &[String]) -> Self {
        let mut args = Map::new();
        args.insert(
            "vector_db_ids".to_string(),
            Value::Array(vector_db_ids.iter().cloned().map(Value::String).collect()),
        );
        Self::WithArgs {
            name: "builtin::rag/knowledge_search".to_string(),
            args,
        }
    }
}

/// Configuration for a new agent.
#[derive(Debug, Clone, Serialize)]
pub struct AgentConfig {
    pub model: String,
    pub instructions: String,
    pub enable_session_persistence: bool,
    pub toolgroups: Vec<AgentToolgroup>,
    pub sampling_params: SamplingParams,
}

#[derive(Serialize)]
struct AgentCreateRequest<'a> {
    agent_config: &'a AgentConfig,
}

#[derive(Deserialize)]
struct AgentCreateResponse {
    agent_id: String,
}

#[derive(Debug, Deserialize)]
struct AgentInfo {
    agent_id: String,
}

#[derive(Deserialize)]
struct AgentListResponse {
    data: Vec<AgentInfo>,
}

#[derive(Serialize)]
struct SessionCreateRequest<'a> {
    session_name: &'a str,
}

#[derive(Deserialize)]
struct SessionCreateResponse {
    session_id: String,
}

#[derive(Serialize)]
struct TurnCreateRequest<'a> {
    messages: &'a [Message],
    stream: bool,
}

impl StackClient {
    /// Create an agent and return its id.
    pub async fn create_agent(&self, config: &AgentConfig) -> Result<String> {
        info!(model = %config.model, "Creating agent");
        let response = self
            .http()
            .post(self.endpoint("/v1/agents")?)
            .json(&AgentCreateRequest {
                agent_config: config,
            })
            .send()
            .await?;
        let body: AgentCreateResponse = Self::check(response).await?.json().await?;
        Ok(body.agent_id)
    }

    /// List the ids of existing agents.
    pub async fn list_agents(&self) -> Result<Vec<String>> {
        let response = self.http().get(self.endpoint("/v1/agents")?).send().await?;
        let body: AgentListResponse = Self::check(response).await?.json().await?;
        Ok(body.data.into_iter().map(|a| a.agent_id).collect())
    }

    /// Delete an agent.
    pub async fn delete_agent(&self, agent_id: &str) -> Result<()> {
        info!(agent_id, "Deleting agent");
        let response = self
            .http()
            .delete(self.endpoint(&format!("/v1/agents/{}", agent_id))?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Create a named session for an agent and return its id.
    pub async fn create_session(&self, agent_id: &str, session_name: &str) -> Result<String> {
        let response = self
            .http()
            .post(self.endpoint(&format!("/v1/agents/{}/session", agent_id))?)
            .json(&SessionCreateRequest { session_name })
            .send()
            .await?;
        let body: SessionCreateResponse = Self::check(response).await?.json().await?;
        Ok(body.session_id)
    }

    /// Run a streaming agent turn, delivering each parsed event chunk
    /// to `on_event` as it arrives.
    pub async fn create_turn<F>(
        &self,
        agent_id: &str,
        session_id: &str,
        messages: &[Message],
        mut on_event: F,
    ) -> Result<()>
    where
        F: FnMut(&TurnStreamChunk),
    {
        let path = format!("/v1/agents/{}/session/{}/turn", agent_id, session_id);
        let response = self
            .http()
            .post(self.endpoint(&path)?)
            .json(&TurnCreateRequest {
                messages,
                stream: true,
            })
            .send()
            .await?;
        let response = Self::check(response).await?;

        let mut stream = response.bytes_stream();
        let mut buffer = String::new();

        while let Some(bytes) = stream.next().await {
            let bytes = bytes?;
            buffer.push_str(&String::from_utf8_lossy(&bytes));

            // SSE frames are newline-delimited; keep any partial line.
            while let Some(pos) = buffer.find('\n') {
                let line = buffer[..pos].trim().to_string();
                buffer.drain(..=pos);

                let Some(data) = line.strip_prefix("data:") else {
                    continue;
                };
                let data = data.trim();
                if data.is_empty() || data == "[DONE]" {
                    continue;
                }

                match serde_json::from_str::<TurnStreamChunk>(data) {
                    Ok(chunk) => on_event(&chunk),
                    Err(e) => {
                        warn!(error = %e, "Skipping unparseable turn event");
                        debug!(data, "Offending event payload");
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_config_serialization() {
        let config = AgentConfig {
            model: "llama3.2".to_string(),
            instructions: "You are a helpful assistant.".to_string(),
            enable_session_persistence: false,
            toolgroups: vec![
                AgentToolgroup::Name("mcp::demo".to_string()),
                AgentToolgroup::knowledge_search(&["demo-db".to_string()]),
            ],
            sampling_params: SamplingParams::default(),
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["toolgroups"][0], "mcp::demo");
        assert_eq!(
            value["toolgroups"][1]["name"],
            "builtin::rag/knowledge_search"
        );
        assert_eq!(
            value["toolgroups"][1]["args"]["vector_db_ids"][0],
            "demo-db"
        );
        assert_eq!(value["sampling_params"]["max_tokens"], 2048);
    }
}
