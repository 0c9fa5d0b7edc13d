//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// Backend completion failed (transport, auth, model error)
    #[error("Backend error: {0}")]
    Backend(String),

    /// Backend unavailable or not responding
    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Tool arguments failed schema validation
    #[error("Invalid tool input: {0}")]
    InvalidToolInput(String),

    /// Tool execution failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Turn budget exhausted without a final answer
    #[error("Turn budget ({0}) exhausted without a final answer")]
    TurnBudgetExceeded(usize),

    /// Parse error (e.g. tool request arguments)
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other/unknown error
    #[error("{0}")]
    Other(String),
}

impl AgentError {
    /// Whether this error is recovered inside the loop (turned into a
    /// `Tool` turn) rather than aborting the `process` call.
    pub fn is_tool_level(&self) -> bool {
        matches!(
            self,
            AgentError::ToolNotFound(_)
                | AgentError::InvalidToolInput(_)
                | AgentError::ToolExecution(_)
        )
    }

    /// Human-readable description used as the final answer text when a
    /// `process` call does not terminate normally.
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Backend(msg) => format!("Error: backend request failed: {msg}"),
            AgentError::BackendUnavailable(_) => {
                "Error: the backend is currently unavailable.".into()
            }
            AgentError::ToolNotFound(name) => format!("Error: unknown tool '{name}'."),
            AgentError::InvalidToolInput(msg) => format!("Error: invalid tool input: {msg}"),
            AgentError::ToolExecution(msg) => format!("Error: tool failed: {msg}"),
            AgentError::TurnBudgetExceeded(n) => {
                format!("Error: no final answer after {n} reasoning turns.")
            }
            other => format!("Error: {other}"),
        }
    }
}

impl From<anyhow::Error> for AgentError {
    fn from(err: anyhow::Error) -> Self {
        AgentError::Other(err.to_string())
    }
}
