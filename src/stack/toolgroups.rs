//! Toolgroup registration, including remote MCP tool servers.

use super::StackClient;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use tracing::info;

/// A registered toolgroup, as reported by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolgroupInfo {
    pub identifier: String,
    #[serde(default)]
    pub provider_id: String,
}

#[derive(Deserialize)]
struct ToolgroupListResponse {
    data: Vec<ToolgroupInfo>,
}

/// Endpoint of a remote MCP server exposing tools over SSE.
#[derive(Debug, Clone, Serialize)]
pub struct McpEndpoint {
    pub uri: String,
}

#[derive(Serialize)]
struct ToolgroupRegisterRequest<'a> {
    toolgroup_id: &'a str,
    provider_id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    mcp_endpoint: Option<McpEndpoint>,
}

impl StackClient {
    /// List registered toolgroups.
    pub async fn list_toolgroups(&self) -> Result<Vec<ToolgroupInfo>> {
        let response = self
            .http()
            .get(self.endpoint("/v1/toolgroups")?)
            .send()
            .await?;
        let body: ToolgroupListResponse = Self::check(response).await?.json().await?;
        Ok(body.data)
    }

    /// Register a toolgroup backed by a remote MCP server.
    pub async fn register_mcp_toolgroup(
        &self,
        toolgroup_id: &str,
        provider_id: &str,
        endpoint_uri: &str,
    ) -> Result<()> {
        info!(toolgroup_id, endpoint_uri, "Registering MCP toolgroup");
        let request = ToolgroupRegisterRequest {
            toolgroup_id,
            provider_id,
            mcp_endpoint: Some(McpEndpoint {
                uri: endpoint_uri.to_string(),
            }),
        };
        let response = self
            .http()
            .post(self.endpoint("/v1/toolgroups")?)
            .json(&request)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }

    /// Unregister a toolgroup.
    pub async fn unregister_toolgroup(&self, toolgroup_id: &str) -> Result<()> {
        info!(toolgroup_id, "Unregistering toolgroup");
        let response = self
            .http()
            .delete(self.endpoint(&format!("/v1/toolgroups/{}", toolgroup_id))?)
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_carries_endpoint() {
        let request = ToolgroupRegisterRequest {
            toolgroup_id: "mcp::demo",
            provider_id: "model-context-protocol",
            mcp_endpoint: Some(McpEndpoint {
                uri: "http://localhost:8000/sse".to_string(),
            }),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["toolgroup_id"], "mcp::demo");
        assert_eq!(value["mcp_endpoint"]["uri"], "http://localhost:8000/sse");
    }
}
