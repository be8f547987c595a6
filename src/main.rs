//! Tolk CLI entry point.

use anyhow::Result;
use clap::Parser;
use tolk::cli::{commands, Cli, Commands};
use tolk::config::Settings;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| format!("tolk={}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Load configuration
    let settings = match &cli.config {
        Some(path) => Settings::load_from(Some(&Settings::expand_path(path)))?,
        None => Settings::load()?,
    };

    // Execute command
    match cli.command {
        Commands::Chat {
            questions,
            questions_file,
            model,
            instructions,
        } => {
            commands::run_chat(&questions, questions_file, model, instructions, settings).await?;
        }

        Commands::Mcp {
            server,
            server_args,
            questions,
            questions_file,
            model,
            instructions,
        } => {
            commands::run_mcp(
                &server,
                &server_args,
                &questions,
                questions_file,
                model,
                instructions,
                settings,
            )
            .await?;
        }

        Commands::Rag {
            source,
            question,
            model,
            chunk_size,
            keep_existing,
        } => {
            commands::run_rag(&source, &question, model, chunk_size, keep_existing, settings)
                .await?;
        }

        Commands::Agent {
            endpoint,
            prompt,
            model,
            toolgroup,
        } => {
            commands::run_agent(&endpoint, &prompt, model, toolgroup, settings).await?;
        }

        Commands::Config { action } => {
            commands::run_config(&action, settings)?;
        }
    }

    Ok(())
}
