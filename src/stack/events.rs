//! Streamed agent turn events and console rendering.

use console::style;
use serde::Deserialize;
use serde_json::Value;
use std::io::Write;

/// One server-sent chunk of a streaming agent turn.
///
/// The event schema is tolerant by design: unknown event or step types
/// are carried through as strings and simply not rendered.
#[derive(Debug, Clone, Deserialize)]
pub struct TurnStreamChunk {
    pub event: TurnEvent,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TurnEvent {
    pub payload: EventPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventPayload {
    pub event_type: String,
    #[serde(default)]
    pub step_type: Option<String>,
    #[serde(default)]
    pub delta: Option<EventDelta>,
    #[serde(default)]
    pub turn: Option<Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventDelta {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub tool_call: Option<Value>,
}

/// Renders streamed turn events to the console, in the spirit of the
/// Python client's `AgentEventLogger`.
#[derive(Default)]
pub struct TurnLogger {
    printed_text: bool,
}

impl TurnLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Render one chunk.
    pub fn log(&mut self, chunk: &TurnStreamChunk) {
        let payload = &chunk.event.payload;
        match payload.event_type.as_str() {
            "step_start" => {
                if let Some(step) = &payload.step_type {
                    eprintln!("{}", style(format!("[{}]", step)).dim());
                }
            }
            "step_progress" => {
                if let Some(delta) = &payload.delta {
                    if let Some(text) = &delta.text {
                        print!("{}", text);
                        std::io::stdout().flush().ok();
                        self.printed_text = true;
                    }
                    if let Some(tool_call) = &delta.tool_call {
                        eprintln!("{}", style(format!("  tool: {}", tool_call)).dim());
                    }
                }
            }
            "turn_complete" => {
                if self.printed_text {
                    println!();
                    self.printed_text = false;
                }
            }
            _ => {}
        }
    }
}
