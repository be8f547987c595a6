//! Chat command: the demo-tool question loop.

use super::{collect_questions, drive_questions, stack_client};
use crate::chat::demo_tools;
use crate::cli::Output;
use crate::config::Settings;
use crate::stack::StackChat;
use anyhow::Result;
use std::path::PathBuf;

/// Run a batch of questions against the built-in demo tools.
pub async fn run_chat(
    questions: &[String],
    questions_file: Option<PathBuf>,
    model: Option<String>,
    instructions: Option<String>,
    settings: Settings,
) -> Result<()> {
    let questions = collect_questions(questions, questions_file.as_deref())?;

    let client = stack_client(&settings)?;
    let model = model.unwrap_or_else(|| settings.inference.model.clone());

    let registry = demo_tools::demo_registry();
    let backend = StackChat::new(&client, &model, demo_tools::demo_tool_defs());

    Output::info(&format!(
        "Chatting with {} via {} ({} tools)",
        model,
        settings.server.base_url,
        registry.len()
    ));

    drive_questions(
        &backend,
        &registry,
        settings.inference.on_tool_error,
        instructions.as_deref(),
        &questions,
    )
    .await?;

    Ok(())
}
