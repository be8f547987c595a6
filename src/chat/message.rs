//! Conversation message types matching the Llama Stack wire encoding.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

/// Why the model stopped generating an assistant turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndOfTurn,
    EndOfMessage,
    OutOfTokens,
}

/// Arguments passed to a tool handler, keyed by parameter name.
pub type ToolArguments = Map<String, Value>;

/// A request, emitted by an assistant turn, to invoke a named tool.
///
/// `call_id` correlates the eventual tool result back to this request.
/// It is unique within one assistant turn, not globally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    pub call_id: String,
    pub tool_name: String,
    #[serde(default)]
    pub arguments: ToolArguments,
}

/// A single conversation message.
///
/// One unified type covers all four roles; the optional fields are
/// populated per role (`call_id`/`tool_name` on tool results,
/// `stop_reason`/`tool_calls` on assistant turns) and skipped on the
/// wire when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stop_reason: Option<StopReason>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolRequest>,
}

impl Message {
    fn base(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            stop_reason: None,
            call_id: None,
            tool_name: None,
            tool_calls: Vec::new(),
        }
    }

    /// Create a system instruction message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::base(Role::System, content)
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::base(Role::User, content)
    }

    /// Create a plain assistant message (no tool calls).
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::base(Role::Assistant, content)
    }

    /// Create a tool result message correlated to a tool request.
    pub fn tool_result(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            call_id: Some(call_id.into()),
            tool_name: Some(tool_name.into()),
            ..Self::base(Role::Tool, content)
        }
    }

    /// Whether this message requests any tool invocations.
    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

/// Append-only conversation history.
///
/// Insertion order is conversation order; entries are never removed or
/// edited. Owned exclusively by the caller that started the conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a system instruction.
    pub fn with_instructions(instructions: impl Into<String>) -> Self {
        let mut transcript = Self::new();
        transcript.push(Message::system(instructions));
        transcript
    }

    /// Append a message to the end of the conversation.
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// All messages, in conversation order.
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_message_wire_shape() {
        let msg = Message::user("What is my favorite color?");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({"role": "user", "content": "What is my favorite color?"})
        );
    }

    #[test]
    fn test_tool_result_wire_shape() {
        let msg = Message::tool_result("c1", "favorite_color_tool", "black");
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(
            value,
            json!({
                "role": "tool",
                "content": "black",
                "call_id": "c1",
                "tool_name": "favorite_color_tool"
            })
        );
    }

    #[test]
    fn test_deserialize_completion_message() {
        let raw = json!({
            "role": "assistant",
            "content": "",
            "stop_reason": "end_of_turn",
            "tool_calls": [{
                "call_id": "c1",
                "tool_name": "favorite_color_tool",
                "arguments": {"city": "Ottawa", "country": "Canada"}
            }]
        });
        let msg: Message = serde_json::from_value(raw).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.stop_reason, Some(StopReason::EndOfTurn));
        assert!(msg.has_tool_calls());
        assert_eq!(msg.tool_calls[0].tool_name, "favorite_color_tool");
        assert_eq!(msg.tool_calls[0].arguments["city"], json!("Ottawa"));
    }

    #[test]
    fn test_transcript_preserves_order() {
        let mut transcript = Transcript::with_instructions("You are a helpful assistant.");
        transcript.push(Message::user("hello"));
        transcript.push(Message::assistant("hi"));

        let roles: Vec<Role> = transcript.messages().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::System, Role::User, Role::Assistant]);
    }
}
