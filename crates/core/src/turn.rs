//! Conversation Turns
//!
//! Discriminated turn types and the transcript they live in. One variant
//! per role makes the "one `Tool` turn per `ToolRequest`, matched by id"
//! invariant checkable instead of a convention over loose maps.

use serde::{Deserialize, Serialize};

use crate::tool::ToolRequest;

/// A single turn in a conversation, tagged by role
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Turn {
    /// System prompt/instructions
    System { content: String },

    /// User input
    User { content: String },

    /// Backend response: final text, tool requests, or both
    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        tool_requests: Vec<ToolRequest>,
    },

    /// Tool result, tied back to the request that produced it
    Tool { request_id: String, content: String },
}

impl Turn {
    /// Create a system turn
    pub fn system(content: impl Into<String>) -> Self {
        Turn::System { content: content.into() }
    }

    /// Create a user turn
    pub fn user(content: impl Into<String>) -> Self {
        Turn::User { content: content.into() }
    }

    /// Create a plain-text assistant turn
    pub fn assistant(content: impl Into<String>) -> Self {
        Turn::Assistant {
            content: Some(content.into()),
            tool_requests: Vec::new(),
        }
    }

    /// Create an assistant turn carrying tool requests
    pub fn assistant_tool_use(content: Option<String>, tool_requests: Vec<ToolRequest>) -> Self {
        Turn::Assistant { content, tool_requests }
    }

    /// Create a tool-result turn for a given request id
    pub fn tool_result(request_id: impl Into<String>, content: impl Into<String>) -> Self {
        Turn::Tool {
            request_id: request_id.into(),
            content: content.into(),
        }
    }

    /// Role name as sent over the wire
    pub fn role(&self) -> &'static str {
        match self {
            Turn::System { .. } => "system",
            Turn::User { .. } => "user",
            Turn::Assistant { .. } => "assistant",
            Turn::Tool { .. } => "tool",
        }
    }
}

/// Ordered conversation history, mutated only by the orchestration loop
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transcript seeded with a system prompt
    pub fn with_system_prompt(prompt: impl Into<String>) -> Self {
        Self {
            turns: vec![Turn::system(prompt)],
        }
    }

    /// Append a turn (insertion order is conversational order)
    pub fn push(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    /// All turns, in order
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The most recent turn
    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Discard all turns and re-seed with a single system turn
    pub fn reseed(&mut self, prompt: impl Into<String>) {
        self.turns.clear();
        self.turns.push(Turn::system(prompt));
    }

    /// Number of turns
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
