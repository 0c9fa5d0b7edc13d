//! Orchestration Loop
//!
//! The bounded state machine at the heart of the benchmark: drive a
//! transcript through the backend, detect tool requests, dispatch them in
//! order, feed results back, and terminate with a final answer or an
//! error-flavored response. Every failure surfaces as data in the response
//! content; nothing unwinds past `run`.

use std::sync::Arc;

use crate::agent::{AgentResponse, ToolCallRecord};
use crate::backend::{BackendClient, BackendResult, GenerationOptions};
use crate::error::AgentError;
use crate::metrics::MetricsCollector;
use crate::tool::ToolRegistry;
use crate::turn::{Transcript, Turn};

/// Loop configuration
#[derive(Clone, Debug)]
pub struct OrchestratorConfig {
    /// System prompt seeded into every fresh transcript
    pub system_prompt: String,

    /// Maximum backend round-trips per `run` before forcing termination
    pub turn_budget: usize,

    /// Generation options forwarded to the backend
    pub generation: GenerationOptions,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
            turn_budget: 10,
            generation: GenerationOptions::default(),
        }
    }
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "\
You are a helpful assistant with access to the following tools:

- get_weather: Get the current weather for a location
- search_knowledge_base: Search a knowledge base for information
- calculate: Evaluate a mathematical expression

Use these tools when needed to provide accurate and helpful responses.";

/// The orchestration loop
pub struct Orchestrator {
    backend: Arc<dyn BackendClient>,
    tools: Arc<ToolRegistry>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        backend: Arc<dyn BackendClient>,
        tools: Arc<ToolRegistry>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            backend,
            tools,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Drive one user message to completion.
    ///
    /// Appends the `User` turn, then performs up to `turn_budget` backend
    /// calls. Tool requests are dispatched strictly sequentially in the
    /// order the backend enumerated them; each `Tool` turn is appended
    /// before the next request runs, since a result may influence reasoning
    /// already committed to the transcript.
    pub async fn run(
        &self,
        transcript: &mut Transcript,
        user_text: &str,
        metrics: &mut MetricsCollector,
    ) -> AgentResponse {
        transcript.push(Turn::user(user_text));

        let catalog = self.tools.catalog();
        let mut tool_calls: Vec<ToolCallRecord> = Vec::new();

        for round in 0..self.config.turn_budget {
            let reply = self
                .backend
                .complete(transcript.turns(), &catalog, &self.config.generation)
                .await;
            metrics.record_usage(reply.usage());

            match reply {
                BackendResult::Failure { reason } => {
                    metrics.record_error();
                    tracing::warn!(round, %reason, "backend call failed");
                    return AgentResponse {
                        content: AgentError::Backend(reason).user_message(),
                        tool_calls,
                    };
                }

                BackendResult::Answer { content, .. } => {
                    transcript.push(Turn::assistant(&content));
                    return AgentResponse {
                        content,
                        tool_calls,
                    };
                }

                BackendResult::ToolUse { requests, .. } => {
                    metrics.record_tool_calls(requests.len());
                    transcript.push(Turn::assistant_tool_use(None, requests.clone()));

                    for request in &requests {
                        tracing::debug!(tool = %request.name, id = %request.id, "dispatching tool");
                        tool_calls.push(ToolCallRecord {
                            tool_name: request.name.clone(),
                            tool_input: request.arguments.clone(),
                        });

                        // A failed dispatch becomes conversational content;
                        // the backend may recover on the next iteration.
                        let outcome = self.tools.dispatch(request).await;
                        if outcome.is_error() {
                            tracing::debug!(tool = %request.name, "tool dispatch failed");
                        }
                        transcript.push(Turn::tool_result(&request.id, outcome.to_turn_content()));
                    }
                }
            }
        }

        metrics.record_error();
        tracing::warn!(budget = self.config.turn_budget, "turn budget exhausted");
        AgentResponse {
            content: AgentError::TurnBudgetExceeded(self.config.turn_budget).user_message(),
            tool_calls,
        }
    }
}
