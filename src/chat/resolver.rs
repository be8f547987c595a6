//! Tool-call resolution loop.
//!
//! Turns a chain of "assistant asks for tools, tools execute, assistant
//! is re-asked" into a single call that returns the final answer. The
//! loop is iterative rather than recursive: conversation length bounds
//! nothing, so recursion depth must not either.

use super::message::{Message, Transcript};
use super::registry::ToolRegistry;
use crate::error::{Result, TolkError};
use async_trait::async_trait;
use tracing::{debug, info, warn};

/// The inference boundary: submits a transcript and returns the next
/// assistant turn, possibly carrying tool requests.
///
/// Failures here are not recovered by the resolver; they propagate to
/// the caller.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn chat(&self, transcript: &Transcript) -> Result<Message>;
}

/// What to do when a registered tool handler fails.
///
/// The demo scripts this harness grew out of disagreed: one folded the
/// failure into the conversation as tool output, another let it abort
/// the current question. Both behaviors are kept as explicit policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolFailurePolicy {
    /// Surface the failure as the tool's result text and keep going.
    #[default]
    Absorb,
    /// Return the failure to the caller, abandoning the conversation turn.
    Propagate,
}

impl std::str::FromStr for ToolFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "absorb" => Ok(ToolFailurePolicy::Absorb),
            "propagate" => Ok(ToolFailurePolicy::Propagate),
            _ => Err(format!("Unknown tool failure policy: {}", s)),
        }
    }
}

impl std::fmt::Display for ToolFailurePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolFailurePolicy::Absorb => write!(f, "absorb"),
            ToolFailurePolicy::Propagate => write!(f, "propagate"),
        }
    }
}

/// Resolves tool requests from assistant turns until the model produces
/// a final answer.
pub struct Resolver<'a> {
    registry: &'a ToolRegistry,
    backend: &'a dyn ChatBackend,
    policy: ToolFailurePolicy,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a registry and an inference backend.
    pub fn new(registry: &'a ToolRegistry, backend: &'a dyn ChatBackend) -> Self {
        Self {
            registry,
            backend,
            policy: ToolFailurePolicy::default(),
        }
    }

    /// Set the tool failure policy.
    pub fn with_policy(mut self, policy: ToolFailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Drive the conversation until the assistant answers without
    /// requesting tools, returning that final answer.
    ///
    /// Every tool request in an assistant turn gets exactly one tool
    /// result message, appended in request order, before the transcript
    /// is re-submitted. The transcript only ever grows.
    pub async fn resolve(&self, transcript: &mut Transcript, response: Message) -> Result<String> {
        let mut response = response;

        loop {
            transcript.push(response.clone());

            if !response.has_tool_calls() {
                return Ok(response.content);
            }

            for request in &response.tool_calls {
                info!(
                    tool = %request.tool_name,
                    call_id = %request.call_id,
                    "Executing tool call"
                );

                let result = match self.registry.get(&request.tool_name) {
                    Some(handler) => match handler.call(&request.arguments).await {
                        Ok(output) => output,
                        Err(e) => match self.policy {
                            ToolFailurePolicy::Absorb => {
                                warn!(tool = %request.tool_name, error = %e, "Tool call failed");
                                format!("tool call failed: {}", e)
                            }
                            ToolFailurePolicy::Propagate => {
                                return Err(TolkError::Tool {
                                    name: request.tool_name.clone(),
                                    message: e.to_string(),
                                });
                            }
                        },
                    },
                    None => {
                        warn!(tool = %request.tool_name, "Unknown tool requested");
                        format!("Invalid tool called: {}", request.tool_name)
                    }
                };

                transcript.push(Message::tool_result(
                    &request.call_id,
                    &request.tool_name,
                    result,
                ));
            }

            debug!(messages = transcript.len(), "Re-submitting transcript");
            response = self.backend.chat(transcript).await?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::message::{Role, ToolArguments, ToolRequest};
    use crate::chat::demo_tools;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Backend that replays a scripted sequence of assistant turns.
    struct ScriptedBackend {
        responses: Mutex<Vec<Message>>,
        calls: AtomicUsize,
    }

    impl ScriptedBackend {
        fn new(mut responses: Vec<Message>) -> Self {
            responses.reverse();
            Self {
                responses: Mutex::new(responses),
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn chat(&self, _transcript: &Transcript) -> Result<Message> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop()
                .ok_or_else(|| TolkError::Stack("no scripted response left".into()))
        }
    }

    fn tool_request(call_id: &str, tool_name: &str, args: serde_json::Value) -> ToolRequest {
        let arguments: ToolArguments = match args {
            serde_json::Value::Object(map) => map,
            _ => ToolArguments::new(),
        };
        ToolRequest {
            call_id: call_id.to_string(),
            tool_name: tool_name.to_string(),
            arguments,
        }
    }

    fn assistant_with_calls(calls: Vec<ToolRequest>) -> Message {
        Message {
            tool_calls: calls,
            ..Message::assistant("")
        }
    }

    #[tokio::test]
    async fn test_terminal_response_appends_one_message() {
        let registry = ToolRegistry::new();
        let backend = ScriptedBackend::new(vec![]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("hello"));

        let answer = resolver
            .resolve(&mut transcript, Message::assistant("hi there"))
            .await
            .unwrap();

        assert_eq!(answer, "hi there");
        assert_eq!(transcript.len(), 2);
        // Terminal case never issues a follow-up inference call.
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_tool_results_appended_in_request_order() {
        let registry = demo_tools::demo_registry();
        let backend = ScriptedBackend::new(vec![Message::assistant("done")]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("color and team?"));

        let response = assistant_with_calls(vec![
            tool_request(
                "c1",
                "favorite_color_tool",
                json!({"city": "Ottawa", "country": "Canada"}),
            ),
            tool_request(
                "c2",
                "favorite_hockey_tool",
                json!({"city": "Montreal", "country": "Canada"}),
            ),
        ]);

        let answer = resolver.resolve(&mut transcript, response).await.unwrap();
        assert_eq!(answer, "done");

        // user, assistant(+2 calls), tool, tool, assistant
        let messages = transcript.messages();
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[2].call_id.as_deref(), Some("c1"));
        assert_eq!(
            messages[2].content,
            "Favorite color for Ottawa, Canada is black."
        );
        assert_eq!(messages[3].call_id.as_deref(), Some("c2"));
        assert_eq!(
            messages[3].content,
            "Favorite hockey team for Montreal, Canada is The Montreal Canadiens."
        );
        assert_eq!(messages[4].role, Role::Assistant);
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_unknown_tool_continues_conversation() {
        let registry = ToolRegistry::new();
        let backend = ScriptedBackend::new(vec![Message::assistant("recovered")]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("?"));

        let response =
            assistant_with_calls(vec![tool_request("c1", "unknown_tool", json!({}))]);

        let answer = resolver.resolve(&mut transcript, response).await.unwrap();
        assert_eq!(answer, "recovered");

        let tool_msg = &transcript.messages()[2];
        assert_eq!(tool_msg.role, Role::Tool);
        assert!(tool_msg.content.contains("Invalid tool called"));
        assert_eq!(backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_failing_handler_absorbed_by_default() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("flaky", |_args| {
            Err(TolkError::InvalidInput("boom".into()))
        });

        let backend = ScriptedBackend::new(vec![Message::assistant("ok")]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("?"));

        let response = assistant_with_calls(vec![tool_request("c1", "flaky", json!({}))]);

        let answer = resolver.resolve(&mut transcript, response).await.unwrap();
        assert_eq!(answer, "ok");

        let tool_msg = &transcript.messages()[2];
        assert!(tool_msg.content.starts_with("tool call failed:"));
        assert!(tool_msg.content.contains("boom"));
    }

    #[tokio::test]
    async fn test_failing_handler_propagates_under_policy() {
        let mut registry = ToolRegistry::new();
        registry.register_fn("flaky", |_args| {
            Err(TolkError::InvalidInput("boom".into()))
        });

        let backend = ScriptedBackend::new(vec![]);
        let resolver =
            Resolver::new(&registry, &backend).with_policy(ToolFailurePolicy::Propagate);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("?"));

        let response = assistant_with_calls(vec![tool_request("c1", "flaky", json!({}))]);

        let err = resolver.resolve(&mut transcript, response).await.unwrap_err();
        assert!(matches!(err, TolkError::Tool { .. }));
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_multi_round_resolution() {
        let registry = demo_tools::demo_registry();
        let backend = ScriptedBackend::new(vec![
            assistant_with_calls(vec![tool_request(
                "c2",
                "favorite_hockey_tool",
                json!({"city": "Ottawa", "country": "Canada"}),
            )]),
            Message::assistant("The Senators, and black."),
        ]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("color, then team"));

        let response = assistant_with_calls(vec![tool_request(
            "c1",
            "favorite_color_tool",
            json!({"city": "Ottawa", "country": "Canada"}),
        )]);

        let answer = resolver.resolve(&mut transcript, response).await.unwrap();
        assert_eq!(answer, "The Senators, and black.");
        // user + (assistant, tool) * 2 + final assistant
        assert_eq!(transcript.len(), 6);
        assert_eq!(backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_inference_failure_propagates() {
        let registry = demo_tools::demo_registry();
        let backend = ScriptedBackend::new(vec![]);
        let resolver = Resolver::new(&registry, &backend);

        let mut transcript = Transcript::new();
        transcript.push(Message::user("?"));

        let response = assistant_with_calls(vec![tool_request(
            "c1",
            "favorite_color_tool",
            json!({"city": "Ottawa", "country": "Canada"}),
        )]);

        let err = resolver.resolve(&mut transcript, response).await.unwrap_err();
        assert!(matches!(err, TolkError::Stack(_)));
        // The tool result was still appended before the failed follow-up.
        assert_eq!(transcript.len(), 3);
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!(
            "absorb".parse::<ToolFailurePolicy>().unwrap(),
            ToolFailurePolicy::Absorb
        );
        assert_eq!(
            "Propagate".parse::<ToolFailurePolicy>().unwrap(),
            ToolFailurePolicy::Propagate
        );
        assert!("retry".parse::<ToolFailurePolicy>().is_err());
    }
}
