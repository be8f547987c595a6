//! MCP command: discover tools from a stdio server and chat with them.

use super::{collect_questions, drive_questions, stack_client};
use crate::cli::Output;
use crate::config::Settings;
use crate::mcp::{registry_from_mcp, tool_defs_from_mcp, McpClient};
use crate::stack::StackChat;
use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Spawn an MCP server, discover its tools, and run the question loop
/// with the discovered registry.
pub async fn run_mcp(
    server: &str,
    server_args: &[String],
    questions: &[String],
    questions_file: Option<PathBuf>,
    model: Option<String>,
    instructions: Option<String>,
    settings: Settings,
) -> Result<()> {
    let questions = collect_questions(questions, questions_file.as_deref())?;

    let mut session = McpClient::spawn(server, server_args).await?;
    let server_info = session.initialize().await?;
    let tools = session.list_tools().await?;

    Output::success(&format!(
        "Connected to MCP server '{}' ({} tools)",
        server_info.name,
        tools.len()
    ));
    for tool in &tools {
        Output::list_item(&format!(
            "{} - {}",
            tool.name,
            tool.description.as_deref().unwrap_or("(no description)")
        ));
    }

    let tool_defs = tool_defs_from_mcp(&tools);
    let session = Arc::new(Mutex::new(session));
    let registry = registry_from_mcp(Arc::clone(&session), &tools);

    let client = stack_client(&settings)?;
    let model = model.unwrap_or_else(|| settings.inference.model.clone());
    let backend = StackChat::new(&client, &model, tool_defs);

    let instructions = instructions.unwrap_or_else(|| settings.agent.instructions.clone());

    let result = drive_questions(
        &backend,
        &registry,
        settings.inference.on_tool_error,
        Some(&instructions),
        &questions,
    )
    .await;

    session.lock().await.shutdown().await?;
    result?;

    Ok(())
}
