//! Chat-completion inference endpoint and tool declarations.

use super::StackClient;
use crate::chat::{ChatBackend, Message, Transcript};
use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// One declared parameter of a tool, as the inference API expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParamDefinition {
    pub param_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
}

impl ToolParamDefinition {
    /// A required parameter.
    pub fn required(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            param_type: param_type.into(),
            description: Some(description.into()),
            required: true,
        }
    }

    /// An optional parameter.
    pub fn optional(param_type: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            required: false,
            ..Self::required(param_type, description)
        }
    }
}

/// A tool declaration passed to the inference API so the model knows
/// what it may call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDef {
    pub tool_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub parameters: BTreeMap<String, ToolParamDefinition>,
}

impl ToolDef {
    /// Create a tool declaration from a parameter list.
    pub fn new(
        tool_name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<(String, ToolParamDefinition)>,
    ) -> Self {
        Self {
            tool_name: tool_name.into(),
            description: Some(description.into()),
            parameters: parameters.into_iter().collect(),
        }
    }
}

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    messages: &'a [Message],
    model_id: &'a str,
    tools: &'a [ToolDef],
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    completion_message: Message,
}

impl StackClient {
    /// Submit a transcript for chat completion and return the
    /// assistant's next turn, possibly carrying tool requests.
    pub async fn chat_completion(
        &self,
        messages: &[Message],
        model_id: &str,
        tools: &[ToolDef],
    ) -> Result<Message> {
        debug!(model = model_id, messages = messages.len(), "chat-completion request");

        let request = ChatCompletionRequest {
            messages,
            model_id,
            tools,
        };

        let response = self
            .http()
            .post(self.endpoint("/v1/inference/chat-completion")?)
            .json(&request)
            .send()
            .await?;

        let body: ChatCompletionResponse = Self::check(response).await?.json().await?;
        Ok(body.completion_message)
    }
}

/// `ChatBackend` over a Llama Stack client, a fixed model, and a fixed
/// set of declared tools.
pub struct StackChat<'a> {
    client: &'a StackClient,
    model_id: String,
    tools: Vec<ToolDef>,
}

impl<'a> StackChat<'a> {
    pub fn new(client: &'a StackClient, model_id: impl Into<String>, tools: Vec<ToolDef>) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            tools,
        }
    }

    /// The tools declared on every inference call.
    pub fn tools(&self) -> &[ToolDef] {
        &self.tools
    }
}

#[async_trait]
impl ChatBackend for StackChat<'_> {
    async fn chat(&self, transcript: &Transcript) -> Result<Message> {
        self.client
            .chat_completion(transcript.messages(), &self.model_id, &self.tools)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_completion_request_shape() {
        let messages = vec![Message::user("hi")];
        let tools = vec![ToolDef::new(
            "greet",
            "Greets a person by name",
            vec![(
                "name".to_string(),
                ToolParamDefinition::required("string", "Who to greet"),
            )],
        )];
        let request = ChatCompletionRequest {
            messages: &messages,
            model_id: "llama3.2",
            tools: &tools,
        };

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model_id"], "llama3.2");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["tools"][0]["tool_name"], "greet");
        assert_eq!(
            value["tools"][0]["parameters"]["name"],
            json!({"param_type": "string", "description": "Who to greet", "required": true})
        );
    }

    #[test]
    fn test_optional_param_not_required() {
        let param = ToolParamDefinition::optional("integer", "limit");
        assert!(!param.required);
    }
}
