//! MCP client over stdio.
//!
//! Spawns a tool server as a child process and speaks line-delimited
//! JSON-RPC over its stdin/stdout. The server's stderr is inherited so
//! its diagnostics stay visible.

use super::protocol::*;
use crate::chat::ToolArguments;
use crate::error::{Result, TolkError};
use serde_json::{json, Value};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};
use tracing::{debug, info, warn};

/// A connected stdio MCP session.
pub struct McpClient {
    child: Child,
    stdin: ChildStdin,
    stdout: BufReader<ChildStdout>,
    next_id: u64,
}

impl McpClient {
    /// Spawn the server process and take its stdio pipes. Call
    /// [`initialize`](Self::initialize) before anything else.
    pub async fn spawn(command: &str, args: &[String]) -> Result<Self> {
        info!(command, ?args, "Spawning MCP server");

        let mut child = Command::new(command)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| TolkError::Mcp(format!("failed to spawn '{}': {}", command, e)))?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| TolkError::Mcp("server stdin unavailable".into()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| TolkError::Mcp("server stdout unavailable".into()))?;

        Ok(Self {
            child,
            stdin,
            stdout: BufReader::new(stdout),
            next_id: 1,
        })
    }

    /// Perform the initialize handshake.
    pub async fn initialize(&mut self) -> Result<ServerInfo> {
        let params = json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": {
                "name": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            },
        });

        let result = self.request("initialize", params).await?;
        let init: InitializeResult = serde_json::from_value(result)?;
        info!(
            server = %init.server_info.name,
            protocol = %init.protocol_version,
            "MCP server initialized"
        );

        self.notify("notifications/initialized", json!({})).await?;
        Ok(init.server_info)
    }

    /// List the tools the server exposes.
    pub async fn list_tools(&mut self) -> Result<Vec<McpToolInfo>> {
        let result = self.request("tools/list", json!({})).await?;
        let list: ToolsListResult = serde_json::from_value(result)?;
        Ok(list.tools)
    }

    /// Invoke a tool and return its text output.
    pub async fn call_tool(&mut self, name: &str, arguments: &ToolArguments) -> Result<String> {
        let params = json!({"name": name, "arguments": arguments});
        let result = self.request("tools/call", params).await?;
        let call: CallToolResult = serde_json::from_value(result)?;

        let text = call.text();
        if call.is_error.unwrap_or(false) {
            return Err(TolkError::Mcp(format!("tool '{}' reported: {}", name, text)));
        }
        Ok(text)
    }

    /// Terminate the server process.
    pub async fn shutdown(&mut self) -> Result<()> {
        debug!("Shutting down MCP server");
        self.child.kill().await?;
        Ok(())
    }

    async fn send(&mut self, request: &JsonRpcRequest) -> Result<()> {
        let mut line = serde_json::to_string(request)?;
        line.push('\n');
        self.stdin.write_all(line.as_bytes()).await?;
        self.stdin.flush().await?;
        Ok(())
    }

    async fn notify(&mut self, method: &str, params: Value) -> Result<()> {
        self.send(&JsonRpcRequest::notification(method, params)).await
    }

    /// Issue a request and wait for the response with the matching id,
    /// skipping any server-initiated notifications in between.
    async fn request(&mut self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id;
        self.next_id += 1;

        debug!(method, id, "MCP request");
        self.send(&JsonRpcRequest::call(id, method, params)).await?;

        loop {
            let mut line = String::new();
            let read = self.stdout.read_line(&mut line).await?;
            if read == 0 {
                return Err(TolkError::Mcp(format!(
                    "server closed the connection during '{}'",
                    method
                )));
            }
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let response: JsonRpcResponse = match serde_json::from_str(line) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "Skipping unparseable MCP message");
                    continue;
                }
            };

            match response.id {
                Some(Value::Number(ref n)) if n.as_u64() == Some(id) => {
                    if let Some(error) = response.error {
                        return Err(TolkError::Mcp(format!(
                            "'{}' failed ({}): {}",
                            method, error.code, error.message
                        )));
                    }
                    return Ok(response.result.unwrap_or(Value::Null));
                }
                _ => {
                    debug!("Ignoring message for another id");
                }
            }
        }
    }
}
