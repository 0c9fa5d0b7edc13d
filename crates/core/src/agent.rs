//! Agent Contract
//!
//! The four-operation surface every orchestration strategy presents to the
//! comparison harness, plus the baseline raw-loop implementation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::backend::BackendClient;
use crate::error::{AgentError, Result};
use crate::metrics::{MetricsCollector, MetricsSnapshot};
use crate::orchestrator::{Orchestrator, OrchestratorConfig};
use crate::tool::{Tool, ToolRegistry};
use crate::turn::Transcript;

/// One tool call made during a `process` invocation, in dispatch order
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolCallRecord {
    pub tool_name: String,
    pub tool_input: HashMap<String, serde_json::Value>,
}

/// Externally visible result of one `process` call
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentResponse {
    /// Final answer text; carries a human-readable error description when
    /// the call did not terminate normally
    pub content: String,

    /// Tool calls made, in the order they were dispatched
    #[serde(default)]
    pub tool_calls: Vec<ToolCallRecord>,
}

/// Common contract for interchangeable agent implementations
///
/// A single instance is not designed for concurrent `process` calls;
/// callers serialize calls or construct one instance per conversation.
#[async_trait]
pub trait Agent: Send {
    /// Strategy name, for reports
    fn name(&self) -> &str;

    /// Seed the transcript with the system prompt
    fn initialize(&mut self);

    /// Process one user message to completion
    async fn process(&mut self, user_text: &str) -> AgentResponse;

    /// Discard conversation state and metrics, reseeding the system prompt
    fn reset(&mut self);

    /// Current metrics snapshot
    fn metrics(&self) -> MetricsSnapshot;
}

/// Baseline agent: the raw orchestration loop behind the common contract
pub struct ToolLoopAgent {
    orchestrator: Orchestrator,
    transcript: Transcript,
    metrics: MetricsCollector,
}

impl ToolLoopAgent {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        tools: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        let transcript = Transcript::with_system_prompt(&config.system_prompt);
        Self {
            orchestrator: Orchestrator::new(backend, tools, config),
            transcript,
            metrics: MetricsCollector::new(),
        }
    }

    pub fn builder() -> AgentBuilder {
        AgentBuilder::new()
    }

    /// Conversation history (inspection only; the loop owns mutation)
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }
}

#[async_trait]
impl Agent for ToolLoopAgent {
    fn name(&self) -> &str {
        "tool-loop"
    }

    fn initialize(&mut self) {
        self.transcript
            .reseed(&self.orchestrator.config().system_prompt);
    }

    async fn process(&mut self, user_text: &str) -> AgentResponse {
        self.orchestrator
            .run(&mut self.transcript, user_text, &mut self.metrics)
            .await
    }

    fn reset(&mut self) {
        self.transcript
            .reseed(&self.orchestrator.config().system_prompt);
        self.metrics.reset();
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}

/// Builder for the baseline agent
pub struct AgentBuilder {
    backend: Option<Arc<dyn BackendClient>>,
    tools: ToolRegistry,
    config: OrchestratorConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            backend: None,
            tools: ToolRegistry::new(),
            config: OrchestratorConfig::default(),
        }
    }

    pub fn backend(mut self, backend: Arc<dyn BackendClient>) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn tool<T: Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.generation.model = model.into();
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.config.generation.temperature = temperature;
        self
    }

    pub fn turn_budget(mut self, budget: usize) -> Self {
        self.config.turn_budget = budget;
        self
    }

    pub fn build(self) -> Result<ToolLoopAgent> {
        let backend = self
            .backend
            .ok_or_else(|| AgentError::Config("backend is required".into()))?;

        Ok(ToolLoopAgent::new(
            backend,
            Arc::new(self.tools),
            self.config,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendResult, GenerationOptions};
    use crate::tool::ToolSchema;
    use crate::turn::Turn;

    /// Minimal backend double that always answers with fixed text
    struct FixedAnswerBackend(&'static str);

    #[async_trait]
    impl BackendClient for FixedAnswerBackend {
        fn name(&self) -> &str {
            "fixed"
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
            BackendResult::Answer {
                content: self.0.into(),
                usage: None,
            }
        }
    }

    fn build_agent() -> ToolLoopAgent {
        ToolLoopAgent::builder()
            .backend(Arc::new(FixedAnswerBackend("hello")))
            .system_prompt("You are helpful.")
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_process_updates_transcript() {
        let mut agent = build_agent();
        agent.initialize();

        let response = agent.process("hi").await;
        assert_eq!(response.content, "hello");
        assert!(response.tool_calls.is_empty());
        // system, user, assistant
        assert_eq!(agent.transcript().len(), 3);
    }

    #[tokio::test]
    async fn test_double_reset_is_idempotent() {
        let mut agent = build_agent();
        agent.initialize();
        agent.process("hi").await;

        agent.reset();
        let after_one = agent.transcript().clone();
        agent.reset();

        assert_eq!(agent.transcript().turns(), after_one.turns());
        assert_eq!(agent.transcript().len(), 1);
        assert_eq!(agent.transcript().turns()[0].role(), "system");
        assert_eq!(agent.metrics().error_count, 0);
    }

    #[test]
    fn test_builder_requires_backend() {
        let result = AgentBuilder::new().build();
        assert!(matches!(result, Err(AgentError::Config(_))));
    }
}
