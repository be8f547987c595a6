//! MCP (Model Context Protocol) client for tool discovery.
//!
//! Speaks JSON-RPC 2.0 over a spawned server's stdio, lists the tools
//! it exposes, and bridges them into the tool registry and inference
//! declarations.

mod bridge;
mod client;
mod protocol;

pub use bridge::{registry_from_mcp, tool_defs_from_mcp, McpTool};
pub use client::McpClient;
pub use protocol::{McpToolInfo, ServerInfo};
