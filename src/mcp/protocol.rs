//! MCP client-side protocol types (JSON-RPC 2.0).

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// JSON-RPC request. A request without an id is a notification.
#[derive(Debug, Serialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn call(id: u64, method: &str, params: Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id: Some(id),
            method: method.to_string(),
            params: Some(params),
        }
    }

    pub fn notification(method: &str, params: Value) -> Self {
        Self {
            id: None,
            ..Self::call(0, method, params)
        }
    }
}

/// JSON-RPC response.
#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub result: Option<Value>,
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Initialize response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitializeResult {
    pub protocol_version: String,
    pub server_info: ServerInfo,
}

#[derive(Debug, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    #[serde(default)]
    pub version: String,
}

/// A tool as described by the server's `tools/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct McpToolInfo {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "inputSchema", default)]
    pub input_schema: Value,
}

/// `tools/list` response.
#[derive(Debug, Deserialize)]
pub struct ToolsListResult {
    pub tools: Vec<McpToolInfo>,
}

/// `tools/call` response.
#[derive(Debug, Deserialize)]
pub struct CallToolResult {
    #[serde(default)]
    pub content: Vec<ContentPart>,
    #[serde(rename = "isError", default)]
    pub is_error: Option<bool>,
}

/// One content part of a tool result. Only text parts are consumed;
/// other kinds are dropped.
#[derive(Debug, Clone, Deserialize)]
pub struct ContentPart {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub text: Option<String>,
}

impl CallToolResult {
    /// Concatenate the text content parts, newline-separated.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter(|part| part.kind == "text")
            .filter_map(|part| part.text.as_deref())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_call_request_shape() {
        let request = JsonRpcRequest::call(3, "tools/list", json!({}));
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 3, "method": "tools/list", "params": {}}));
    }

    #[test]
    fn test_notification_has_no_id() {
        let request = JsonRpcRequest::notification("notifications/initialized", json!({}));
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("id").is_none());
    }

    #[test]
    fn test_tool_result_text_joins_text_parts_only() {
        let result: CallToolResult = serde_json::from_value(json!({
            "content": [
                {"type": "text", "text": "Hello, Brian!"},
                {"type": "image", "data": "..."},
                {"type": "text", "text": "bye"}
            ]
        }))
        .unwrap();
        assert_eq!(result.text(), "Hello, Brian!\nbye");
    }

    #[test]
    fn test_tools_list_parsing() {
        let result: ToolsListResult = serde_json::from_value(json!({
            "tools": [{
                "name": "greet",
                "description": "Greets a person by name",
                "inputSchema": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}},
                    "required": ["name"]
                }
            }]
        }))
        .unwrap();
        assert_eq!(result.tools[0].name, "greet");
        assert_eq!(result.tools[0].input_schema["required"][0], "name");
    }
}
