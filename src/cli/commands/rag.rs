//! RAG command: ingest a document and query it through an agent.

use super::stack_client;
use crate::chat::Message;
use crate::cli::Output;
use crate::config::Settings;
use crate::stack::{AgentConfig, AgentToolgroup, RagDocument, SamplingParams, TurnLogger};
use anyhow::Result;
use uuid::Uuid;

/// Register a fresh vector database, ingest one document, and run a
/// streaming turn against an agent armed with knowledge search.
pub async fn run_rag(
    source: &str,
    question: &str,
    model: Option<String>,
    chunk_size: Option<u32>,
    keep_existing: bool,
    settings: Settings,
) -> Result<()> {
    let client = stack_client(&settings)?;
    let model = model.unwrap_or_else(|| settings.inference.model.clone());

    if !keep_existing {
        for db in client.list_vector_dbs().await? {
            Output::info(&format!("Unregistering vector database: {}", db.identifier));
            client.unregister_vector_db(&db.identifier).await?;
        }
    }

    let vector_db_id = format!("demo-vector-db-{}", Uuid::new_v4().simple());
    client
        .register_vector_db(
            &vector_db_id,
            &settings.rag.embedding_model,
            settings.rag.embedding_dimension,
            &settings.rag.provider_id,
        )
        .await?;

    let mime_type = if source.starts_with("http://") || source.starts_with("https://") {
        "text/html"
    } else {
        "text/plain"
    };
    let document = RagDocument::new("document_1", source, mime_type);

    Output::info(&format!("Ingesting document: {}", source));
    let spinner = Output::spinner("Inserting...");
    let insert = client
        .rag_insert(
            &[document],
            &vector_db_id,
            chunk_size.unwrap_or(settings.rag.chunk_size_in_tokens),
        )
        .await;
    spinner.finish_and_clear();
    insert?;
    Output::success(&format!("Created vector database {}", vector_db_id));

    // Stale agents from earlier runs just accumulate; clear them out.
    for agent_id in client.list_agents().await? {
        Output::info(&format!("Deleting agent: {}", agent_id));
        client.delete_agent(&agent_id).await?;
    }

    let config = AgentConfig {
        model,
        instructions: settings.agent.instructions.clone(),
        enable_session_persistence: settings.agent.enable_session_persistence,
        toolgroups: vec![AgentToolgroup::knowledge_search(&[vector_db_id.clone()])],
        sampling_params: SamplingParams {
            max_tokens: settings.agent.max_tokens,
        },
    };

    let agent_id = client.create_agent(&config).await?;
    Output::kv("Agent", &agent_id);

    let session_id = client.create_session(&agent_id, "rag").await?;
    Output::kv("Session", &session_id);

    Output::header("Answer");
    let mut logger = TurnLogger::new();
    client
        .create_turn(
            &agent_id,
            &session_id,
            &[Message::user(question)],
            |chunk| logger.log(chunk),
        )
        .await?;

    Ok(())
}
