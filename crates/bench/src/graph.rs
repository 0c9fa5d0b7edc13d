//! Graph Orchestration Strategy
//!
//! Drives the same backend/registry contract as the raw loop, but as an
//! explicit node/transition state machine behind the shared `Agent`
//! surface, so the harness can compare structurally different strategies
//! on identical inputs.

use std::sync::Arc;

use agentmark_core::{
    Agent, AgentError, AgentResponse, BackendClient, BackendResult, MetricsCollector,
    MetricsSnapshot, OrchestratorConfig, ToolCallRecord, ToolRegistry, ToolRequest, Transcript,
    Turn,
};
use async_trait::async_trait;

/// Nodes of the orchestration graph
enum Node {
    CallBackend,
    RunTools(Vec<ToolRequest>),
    Finish(String),
}

/// Agent implementation built as an explicit state graph:
/// `CallBackend -> RunTools -> CallBackend -> ... -> Finish`
pub struct StepGraphAgent {
    backend: Arc<dyn BackendClient>,
    tools: Arc<ToolRegistry>,
    config: OrchestratorConfig,
    transcript: Transcript,
    metrics: MetricsCollector,
}

impl StepGraphAgent {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        tools: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        let transcript = Transcript::with_system_prompt(&config.system_prompt);
        Self {
            backend,
            tools,
            config,
            transcript,
            metrics: MetricsCollector::new(),
        }
    }

    /// One graph transition. `rounds` counts backend calls made so far.
    async fn step(
        &mut self,
        node: Node,
        rounds: &mut usize,
        tool_calls: &mut Vec<ToolCallRecord>,
    ) -> Node {
        match node {
            Node::CallBackend => {
                if *rounds >= self.config.turn_budget {
                    self.metrics.record_error();
                    return Node::Finish(
                        AgentError::TurnBudgetExceeded(self.config.turn_budget).user_message(),
                    );
                }
                *rounds += 1;

                let catalog = self.tools.catalog();
                let reply = self
                    .backend
                    .complete(self.transcript.turns(), &catalog, &self.config.generation)
                    .await;
                self.metrics.record_usage(reply.usage());

                match reply {
                    BackendResult::Failure { reason } => {
                        self.metrics.record_error();
                        Node::Finish(AgentError::Backend(reason).user_message())
                    }
                    BackendResult::Answer { content, .. } => {
                        self.transcript.push(Turn::assistant(&content));
                        Node::Finish(content)
                    }
                    BackendResult::ToolUse { requests, .. } => {
                        self.metrics.record_tool_calls(requests.len());
                        self.transcript
                            .push(Turn::assistant_tool_use(None, requests.clone()));
                        Node::RunTools(requests)
                    }
                }
            }

            Node::RunTools(requests) => {
                for request in &requests {
                    tool_calls.push(ToolCallRecord {
                        tool_name: request.name.clone(),
                        tool_input: request.arguments.clone(),
                    });
                    let outcome = self.tools.dispatch(request).await;
                    self.transcript
                        .push(Turn::tool_result(&request.id, outcome.to_turn_content()));
                }
                Node::CallBackend
            }

            finish @ Node::Finish(_) => finish,
        }
    }
}

#[async_trait]
impl Agent for StepGraphAgent {
    fn name(&self) -> &str {
        "step-graph"
    }

    fn initialize(&mut self) {
        self.transcript.reseed(&self.config.system_prompt);
    }

    async fn process(&mut self, user_text: &str) -> AgentResponse {
        self.transcript.push(Turn::user(user_text));

        let mut node = Node::CallBackend;
        let mut rounds = 0;
        let mut tool_calls = Vec::new();

        loop {
            match self.step(node, &mut rounds, &mut tool_calls).await {
                Node::Finish(content) => {
                    return AgentResponse {
                        content,
                        tool_calls,
                    };
                }
                next => node = next,
            }
        }
    }

    fn reset(&mut self) {
        self.transcript.reseed(&self.config.system_prompt);
        self.metrics.reset();
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }
}
