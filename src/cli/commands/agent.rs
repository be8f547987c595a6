//! Agent command: remote MCP toolgroup plus one agent turn.

use super::stack_client;
use crate::chat::Message;
use crate::cli::Output;
use crate::config::Settings;
use crate::error::TolkError;
use crate::stack::{AgentConfig, AgentToolgroup, SamplingParams, TurnLogger};
use anyhow::Result;

/// Register a remote MCP server as a toolgroup, recreate an agent with
/// it, and run one streaming turn.
pub async fn run_agent(
    endpoint: &str,
    prompt: &[String],
    model: Option<String>,
    toolgroup: Option<String>,
    settings: Settings,
) -> Result<()> {
    if prompt.is_empty() {
        return Err(TolkError::InvalidInput("no prompt given".into()).into());
    }
    let prompt = prompt.join(" ");

    let client = stack_client(&settings)?;
    let model = model.unwrap_or_else(|| settings.inference.model.clone());
    let toolgroup_id = toolgroup.unwrap_or_else(|| settings.mcp.toolgroup_id.clone());

    // Re-registering an existing toolgroup id fails, so clear old ones.
    for group in client.list_toolgroups().await? {
        Output::info(&format!("Unregistering toolgroup: {}", group.identifier));
        client.unregister_toolgroup(&group.identifier).await?;
    }

    client
        .register_mcp_toolgroup(&toolgroup_id, &settings.mcp.provider_id, endpoint)
        .await?;
    Output::success(&format!(
        "Registered toolgroup {} at {}",
        toolgroup_id, endpoint
    ));

    for agent_id in client.list_agents().await? {
        Output::info(&format!("Deleting agent: {}", agent_id));
        client.delete_agent(&agent_id).await?;
    }

    let config = AgentConfig {
        model,
        instructions: settings.agent.instructions.clone(),
        enable_session_persistence: settings.agent.enable_session_persistence,
        toolgroups: vec![AgentToolgroup::Name(toolgroup_id)],
        sampling_params: SamplingParams {
            max_tokens: settings.agent.max_tokens,
        },
    };

    let agent_id = client.create_agent(&config).await?;
    Output::kv("Agent", &agent_id);

    let session_id = client.create_session(&agent_id, "mcp").await?;
    Output::kv("Session", &session_id);

    Output::header("Answer");
    let mut logger = TurnLogger::new();
    client
        .create_turn(&agent_id, &session_id, &[Message::user(prompt)], |chunk| {
            logger.log(chunk)
        })
        .await?;

    Ok(())
}
