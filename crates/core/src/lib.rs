//! # agentmark-core
//!
//! Common contract and orchestration loop for benchmarking interchangeable
//! tool-calling agents.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     Agent (contract)                         │
//! │  ┌──────────────┐  ┌─────────────┐  ┌────────────────────┐   │
//! │  │ Orchestrator │  │    Tool     │  │   BackendClient    │   │
//! │  │    (loop)    │──│   Registry  │──│   (Strategy)       │   │
//! │  └──────────────┘  └─────────────┘  └────────────────────┘   │
//! │          │                                                   │
//! │     Transcript + MetricsCollector                            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every orchestration strategy (raw loop, graph state machine, ...)
//! presents the same four-operation [`Agent`] surface so the comparison
//! harness can swap them on identical inputs.

pub mod agent;
pub mod backend;
pub mod error;
pub mod metrics;
pub mod orchestrator;
pub mod tool;
pub mod turn;

pub use agent::{Agent, AgentBuilder, AgentResponse, ToolCallRecord, ToolLoopAgent};
pub use backend::{BackendClient, BackendResult, GenerationOptions, TokenUsage};
pub use error::{AgentError, Result};
pub use metrics::{MetricsCollector, MetricsSnapshot};
pub use orchestrator::{Orchestrator, OrchestratorConfig};
pub use tool::{Tool, ToolOutcome, ToolRegistry, ToolRequest, ToolSchema};
pub use turn::{Transcript, Turn};
