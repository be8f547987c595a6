//! Conversation model and the tool-call resolution loop.
//!
//! Owns the transcript/message types, the registry of callable tool
//! handlers, and the resolver that relays tool results back to the
//! inference boundary until the model produces a final answer.

pub mod demo_tools;
mod message;
mod registry;
mod resolver;

pub use message::{Message, Role, StopReason, ToolArguments, ToolRequest, Transcript};
pub use registry::{ToolHandler, ToolRegistry};
pub use resolver::{ChatBackend, Resolver, ToolFailurePolicy};
