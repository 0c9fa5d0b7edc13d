//! Metrics
//!
//! Accumulates token usage, tool-call counts, error counts, and elapsed
//! time across an agent session. Mutated only by the orchestration loop;
//! the comparison harness reads immutable snapshots.

use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::backend::TokenUsage;

/// Point-in-time metrics view, the shape consumed by comparison tooling
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Total tokens reported by the backend across all calls
    pub total_tokens: u64,

    /// Seconds since session start (or last reset)
    pub execution_time: f64,

    /// Number of tool invocations requested by the backend
    pub tool_calls_count: u64,

    /// Fraction of tool calls not resulting in a loop-level error
    pub success_rate: f64,

    /// Loop-level errors (backend failures, budget exhaustion)
    pub error_count: u64,
}

/// Running counters for one agent session
#[derive(Debug)]
pub struct MetricsCollector {
    total_tokens: u64,
    tool_calls_count: u64,
    error_count: u64,
    started: Instant,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self {
            total_tokens: 0,
            tool_calls_count: 0,
            error_count: 0,
            started: Instant::now(),
        }
    }

    /// Fold in usage surfaced by one backend call
    pub fn record_usage(&mut self, usage: Option<TokenUsage>) {
        if let Some(usage) = usage {
            self.total_tokens += u64::from(usage.total_tokens);
        }
    }

    /// Count tool invocations requested on one assistant turn
    pub fn record_tool_calls(&mut self, count: usize) {
        self.tool_calls_count += count as u64;
    }

    /// Count a loop-level error (backend failure or budget exhaustion).
    /// Tool-dispatch failures are conversational content, not errors.
    pub fn record_error(&mut self) {
        self.error_count += 1;
    }

    /// Zero the counters and rebase the elapsed-time clock
    pub fn reset(&mut self) {
        self.total_tokens = 0;
        self.tool_calls_count = 0;
        self.error_count = 0;
        self.started = Instant::now();
    }

    pub fn error_count(&self) -> u64 {
        self.error_count
    }

    /// Derived success rate: 1.0 with no errors, otherwise
    /// `1 - error_count / max(tool_calls_count, 1)`
    pub fn success_rate(&self) -> f64 {
        if self.error_count == 0 {
            1.0
        } else {
            let calls = self.tool_calls_count.max(1) as f64;
            1.0 - (self.error_count as f64 / calls)
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_tokens: self.total_tokens,
            execution_time: self.started.elapsed().as_secs_f64(),
            tool_calls_count: self.tool_calls_count,
            success_rate: self.success_rate(),
            error_count: self.error_count,
        }
    }
}
