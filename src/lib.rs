//! Tolk - Tool-Calling Conversation Harness
//!
//! A CLI harness for driving tool-calling conversations against a
//! Llama Stack server.
//!
//! The name "Tolk" comes from the Norwegian/Scandinavian word for
//! "interpreter."
//!
//! # Overview
//!
//! Tolk allows you to:
//! - Run tool-calling chat loops where the model's tool requests are
//!   resolved against local handlers
//! - Discover tools from a stdio MCP server and expose them to the model
//! - Register vector databases, ingest documents, and query them through
//!   a RAG agent
//! - Register remote MCP tool servers as toolgroups for server-side agents
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - `config` - Configuration management
//! - `chat` - Conversation model and the tool-call resolution loop
//! - `stack` - Typed HTTP client for the Llama Stack API
//! - `mcp` - MCP stdio client for tool discovery
//! - `cli` - Command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use tolk::chat::{demo_tools, Message, Resolver, Transcript};
//! use tolk::stack::{StackChat, StackClient};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = StackClient::new("http://localhost:8321")?;
//!     let registry = demo_tools::demo_registry();
//!     let backend = StackChat::new(&client, "llama3.2", demo_tools::demo_tool_defs());
//!     let resolver = Resolver::new(&registry, &backend);
//!
//!     let mut transcript = Transcript::new();
//!     transcript.push(Message::user("What is my favorite color?"));
//!
//!     let response = client
//!         .chat_completion(transcript.messages(), "llama3.2", backend.tools())
//!         .await?;
//!     let answer = resolver.resolve(&mut transcript, response).await?;
//!     println!("{}", answer);
//!
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod mcp;
pub mod stack;

pub use error::{Result, TolkError};
