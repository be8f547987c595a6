//! Bridges MCP tool descriptions into the inference-side tool model.

use super::client::McpClient;
use super::protocol::McpToolInfo;
use crate::chat::{ToolArguments, ToolHandler, ToolRegistry};
use crate::error::Result;
use crate::stack::{ToolDef, ToolParamDefinition};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Convert MCP JSON-schema tool descriptions into the declarations the
/// inference API expects: `properties.<name>.type` becomes
/// `param_type`, the schema's `required` array becomes per-param flags.
pub fn tool_defs_from_mcp(tools: &[McpToolInfo]) -> Vec<ToolDef> {
    tools
        .iter()
        .map(|tool| {
            let required: Vec<&str> = tool.input_schema["required"]
                .as_array()
                .map(|names| names.iter().filter_map(|n| n.as_str()).collect())
                .unwrap_or_default();

            let parameters = tool.input_schema["properties"]
                .as_object()
                .map(|props| {
                    props
                        .iter()
                        .map(|(name, schema)| {
                            let definition = ToolParamDefinition {
                                param_type: schema["type"]
                                    .as_str()
                                    .unwrap_or("string")
                                    .to_string(),
                                description: schema["description"]
                                    .as_str()
                                    .map(String::from),
                                required: required.contains(&name.as_str()),
                            };
                            (name.clone(), definition)
                        })
                        .collect()
                })
                .unwrap_or_default();

            ToolDef {
                tool_name: tool.name.clone(),
                description: tool.description.clone(),
                parameters,
            }
        })
        .collect()
}

/// Tool handler that forwards invocations to a shared MCP session.
pub struct McpTool {
    session: Arc<Mutex<McpClient>>,
    name: String,
}

#[async_trait]
impl ToolHandler for McpTool {
    async fn call(&self, arguments: &ToolArguments) -> Result<String> {
        let mut session = self.session.lock().await;
        session.call_tool(&self.name, arguments).await
    }
}

/// Build a registry whose handlers dispatch to a shared MCP session.
pub fn registry_from_mcp(session: Arc<Mutex<McpClient>>, tools: &[McpToolInfo]) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    for tool in tools {
        registry.register(
            tool.name.clone(),
            Arc::new(McpTool {
                session: Arc::clone(&session),
                name: tool.name.clone(),
            }),
        );
    }
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_conversion() {
        let tools = vec![McpToolInfo {
            name: "MoveForward".to_string(),
            description: Some("Move the robot forward of a given number of steps.".to_string()),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "steps": {"type": "integer", "description": "How far to move"},
                    "label": {"type": "string"}
                },
                "required": ["steps"]
            }),
        }];

        let defs = tool_defs_from_mcp(&tools);
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].tool_name, "MoveForward");

        let steps = &defs[0].parameters["steps"];
        assert_eq!(steps.param_type, "integer");
        assert_eq!(steps.description.as_deref(), Some("How far to move"));
        assert!(steps.required);

        let label = &defs[0].parameters["label"];
        assert_eq!(label.param_type, "string");
        assert!(!label.required);
    }

    #[test]
    fn test_schema_conversion_tolerates_empty_schema() {
        let tools = vec![McpToolInfo {
            name: "TurnAround".to_string(),
            description: None,
            input_schema: json!({}),
        }];

        let defs = tool_defs_from_mcp(&tools);
        assert!(defs[0].parameters.is_empty());
        assert!(defs[0].description.is_none());
    }
}
