//! Backend Abstraction
//!
//! Defines a common interface for reasoning backends (OpenAI-compatible
//! APIs, scripted doubles, ...) so orchestration strategies can be compared
//! against any of them without code changes.
//!
//! The boundary's contract is error-as-data: `complete` returns a
//! [`BackendResult`], and transport/auth/rate-limit faults collapse into
//! [`BackendResult::Failure`] instead of unwinding through the loop.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::{ToolRequest, ToolSchema};
use crate::turn::Turn;

/// Configuration for backend generation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOptions {
    /// Model identifier (e.g. "gpt-4-turbo", "llama3.2")
    pub model: String,

    /// Temperature for sampling (0.0 = deterministic, 1.0 = creative)
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Top-p nucleus sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,

    /// Stop sequences
    #[serde(default)]
    pub stop_sequences: Vec<String>,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_top_p() -> f32 {
    0.9
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            model: "gpt-4-turbo".into(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            top_p: default_top_p(),
            stop_sequences: Vec::new(),
        }
    }
}

/// Token usage statistics
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl TokenUsage {
    pub fn total(total_tokens: u32) -> Self {
        Self {
            prompt_tokens: 0,
            completion_tokens: 0,
            total_tokens,
        }
    }
}

/// Outcome of a single completion request
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum BackendResult {
    /// Final assistant text; the loop's only normal-termination path
    Answer {
        content: String,
        usage: Option<TokenUsage>,
    },

    /// The backend wants tools run before it can answer
    ToolUse {
        requests: Vec<ToolRequest>,
        usage: Option<TokenUsage>,
    },

    /// Transport/auth/model failure, surfaced as data
    Failure { reason: String },
}

impl BackendResult {
    /// Token usage carried by this result, if any
    pub fn usage(&self) -> Option<TokenUsage> {
        match self {
            BackendResult::Answer { usage, .. } | BackendResult::ToolUse { usage, .. } => *usage,
            BackendResult::Failure { .. } => None,
        }
    }
}

/// Strategy trait for reasoning backends
///
/// Implement this trait to add support for new completion services.
/// Orchestration strategies work exclusively through this interface.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Backend name, for logs and reports
    fn name(&self) -> &str;

    /// Check if the backend is reachable and configured correctly
    async fn health_check(&self) -> Result<bool>;

    /// Issue one completion request over the current turns and tool
    /// catalog. Must not hang indefinitely: implementations apply their own
    /// request timeout and report it as [`BackendResult::Failure`].
    async fn complete(
        &self,
        turns: &[Turn],
        catalog: &[ToolSchema],
        options: &GenerationOptions,
    ) -> BackendResult;
}
