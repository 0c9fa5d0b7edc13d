//! Scripted Backend
//!
//! Deterministic backend double for tests and offline benchmark runs.
//! Replays a fixed sequence of replies; an exhausted script surfaces as a
//! `Failure`, matching the error-as-data contract.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use agentmark_core::{
    backend::{BackendClient, BackendResult, GenerationOptions, TokenUsage},
    error::Result,
    tool::{ToolRequest, ToolSchema},
    turn::Turn,
};
use async_trait::async_trait;

/// Backend that replays canned replies in order
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<BackendResult>>,
    calls: AtomicUsize,
}

impl Default for ScriptedBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Queue a raw reply
    pub fn push(&self, reply: BackendResult) {
        self.replies.lock().unwrap().push_back(reply);
    }

    /// Queue a final answer
    pub fn push_answer(&self, content: impl Into<String>, tokens: u32) {
        self.push(BackendResult::Answer {
            content: content.into(),
            usage: Some(TokenUsage::total(tokens)),
        });
    }

    /// Queue a single-tool request turn
    pub fn push_tool_use(
        &self,
        tool_name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
        tokens: u32,
    ) {
        self.push(BackendResult::ToolUse {
            requests: vec![ToolRequest::new(tool_name, arguments)],
            usage: Some(TokenUsage::total(tokens)),
        });
    }

    /// Queue a failure
    pub fn push_failure(&self, reason: impl Into<String>) {
        self.push(BackendResult::Failure {
            reason: reason.into(),
        });
    }

    /// Number of completion calls served so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Remaining scripted replies
    pub fn remaining(&self) -> usize {
        self.replies.lock().unwrap().len()
    }
}

#[async_trait]
impl BackendClient for ScriptedBackend {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    async fn complete(
        &self,
        _turns: &[Turn],
        _catalog: &[ToolSchema],
        _options: &GenerationOptions,
    ) -> BackendResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(BackendResult::Failure {
                reason: "script exhausted".into(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let backend = ScriptedBackend::new();
        backend.push_answer("first", 10);
        backend.push_answer("second", 12);

        let options = GenerationOptions::default();
        let first = backend.complete(&[], &[], &options).await;
        let second = backend.complete(&[], &[], &options).await;

        match (first, second) {
            (
                BackendResult::Answer { content: a, .. },
                BackendResult::Answer { content: b, .. },
            ) => {
                assert_eq!(a, "first");
                assert_eq!(b, "second");
            }
            other => panic!("unexpected replies: {other:?}"),
        }
        assert_eq!(backend.calls(), 2);
    }

    #[tokio::test]
    async fn test_exhausted_script_fails() {
        let backend = ScriptedBackend::new();
        let reply = backend
            .complete(&[], &[], &GenerationOptions::default())
            .await;
        assert!(matches!(reply, BackendResult::Failure { .. }));
    }
}
