//! CLI module for Tolk.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Tolk - a tool-calling conversation harness for Llama Stack
///
/// Drives tool-calling chat loops, MCP tool discovery, and RAG agent
/// turns against a running Llama Stack server.
#[derive(Parser, Debug)]
#[command(name = "tolk")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ask a batch of questions using the built-in demo tools
    Chat {
        /// Questions to ask, in order
        questions: Vec<String>,

        /// Read questions from a file, one per line
        #[arg(short = 'f', long)]
        questions_file: Option<PathBuf>,

        /// Model id for chat completion
        #[arg(short, long)]
        model: Option<String>,

        /// System instructions prepended to the conversation
        #[arg(long)]
        instructions: Option<String>,
    },

    /// Discover tools from a stdio MCP server and chat with them
    Mcp {
        /// Command that starts the MCP server
        #[arg(long)]
        server: String,

        /// Argument passed to the server command (repeatable)
        #[arg(long = "server-arg")]
        server_args: Vec<String>,

        /// Questions to ask, in order
        questions: Vec<String>,

        /// Read questions from a file, one per line
        #[arg(short = 'f', long)]
        questions_file: Option<PathBuf>,

        /// Model id for chat completion
        #[arg(short, long)]
        model: Option<String>,

        /// System instructions prepended to the conversation
        #[arg(long)]
        instructions: Option<String>,
    },

    /// Ingest a document and query it through a RAG agent
    Rag {
        /// Document source URL (or inline text)
        source: String,

        /// Question to ask about the document
        question: String,

        /// Model id for the agent
        #[arg(short, long)]
        model: Option<String>,

        /// Chunk size in tokens for ingestion
        #[arg(long)]
        chunk_size: Option<u32>,

        /// Keep existing vector databases instead of unregistering them
        #[arg(long)]
        keep_existing: bool,
    },

    /// Register a remote MCP toolgroup and run one agent turn
    Agent {
        /// SSE endpoint of the remote MCP server
        endpoint: String,

        /// Prompt for the agent turn
        prompt: Vec<String>,

        /// Model id for the agent
        #[arg(short, long)]
        model: Option<String>,

        /// Toolgroup id to register the server under
        #[arg(long)]
        toolgroup: Option<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Configuration subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show,
    /// Write a default configuration file
    Init,
    /// Print the configuration file path
    Path,
}
