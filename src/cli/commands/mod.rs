//! Command implementations.

mod agent;
mod chat;
mod config;
mod mcp;
mod rag;

pub use agent::run_agent;
pub use chat::run_chat;
pub use config::run_config;
pub use mcp::run_mcp;
pub use rag::run_rag;

use crate::chat::{ChatBackend, Message, Resolver, ToolFailurePolicy, ToolRegistry, Transcript};
use crate::cli::Output;
use crate::config::Settings;
use crate::error::{Result, TolkError};
use crate::stack::{StackChat, StackClient};
use std::path::Path;
use std::time::Duration;

/// Build the stack client from settings.
pub(crate) fn stack_client(settings: &Settings) -> Result<StackClient> {
    StackClient::with_timeout(
        &settings.server.base_url,
        Duration::from_secs(settings.server.timeout_seconds),
    )
}

/// Merge inline questions with a questions file (one per line).
pub(crate) fn collect_questions(
    questions: &[String],
    file: Option<&Path>,
) -> Result<Vec<String>> {
    let mut all: Vec<String> = questions.to_vec();

    if let Some(path) = file {
        let content = std::fs::read_to_string(path)?;
        all.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(String::from),
        );
    }

    if all.is_empty() {
        return Err(TolkError::InvalidInput(
            "no questions given; pass them as arguments or via --questions-file".into(),
        ));
    }
    Ok(all)
}

/// Run a batch of questions through the tool-call resolver over one
/// growing transcript.
///
/// An inference failure abandons the current question and moves on to
/// the next; isolation is at the whole-question level.
pub(crate) async fn drive_questions(
    backend: &StackChat<'_>,
    registry: &ToolRegistry,
    policy: ToolFailurePolicy,
    instructions: Option<&str>,
    questions: &[String],
) -> Result<()> {
    let resolver = Resolver::new(registry, backend).with_policy(policy);

    let mut transcript = match instructions {
        Some(text) => Transcript::with_instructions(text),
        None => Transcript::new(),
    };

    for (i, question) in questions.iter().enumerate() {
        Output::header(&format!("Question {}", i + 1));
        println!("{}", question);
        transcript.push(Message::user(question.clone()));

        let spinner = Output::spinner("Thinking...");
        let result = match backend.chat(&transcript).await {
            Ok(response) => resolver.resolve(&mut transcript, response).await,
            Err(e) => Err(e),
        };
        spinner.finish_and_clear();

        match result {
            Ok(answer) => println!("\n{}", answer),
            Err(e) => Output::error(&format!("{}", e)),
        }
    }

    Ok(())
}
