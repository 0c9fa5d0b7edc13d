//! Comparison Runner
//!
//! Runs every agent over the fixed query suite, records per-query latency
//! and metrics, and aggregates a serializable report. Agents are reset
//! between queries so the per-query snapshots are independent.

use std::path::Path;
use std::time::Instant;

use agentmark_core::{Agent, MetricsSnapshot, ToolCallRecord};
use serde::Serialize;

/// The identical inputs every strategy is measured on
pub const TEST_QUERIES: [&str; 5] = [
    "What's the weather like in Boston?",
    "Can you calculate 345 * 892?",
    "Search for information about artificial intelligence",
    "What's 25% of 840?",
    "Can you tell me about the capital of France and what the weather is like there right now?",
];

/// One query's outcome for one agent
#[derive(Debug, Serialize)]
pub struct QueryRecord {
    pub query: String,
    pub response: String,
    pub tool_calls: Vec<ToolCallRecord>,
    pub latency_secs: f64,
    pub metrics: MetricsSnapshot,
}

/// One agent's aggregated results
#[derive(Debug, Serialize)]
pub struct AgentReport {
    pub name: String,
    pub avg_latency_secs: f64,
    pub total_tokens: u64,
    pub total_tool_calls: u64,
    pub total_errors: u64,
    pub queries: Vec<QueryRecord>,
}

/// Full comparison output, the persisted artifact
#[derive(Debug, Serialize)]
pub struct ComparisonReport {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub agents: Vec<AgentReport>,
}

/// Run the suite over every agent in turn
pub async fn run_comparison(agents: &mut [Box<dyn Agent>]) -> ComparisonReport {
    let mut reports = Vec::with_capacity(agents.len());

    for agent in agents.iter_mut() {
        tracing::info!(agent = agent.name(), "running comparison suite");
        agent.initialize();

        let mut queries = Vec::with_capacity(TEST_QUERIES.len());
        for (i, query) in TEST_QUERIES.iter().enumerate() {
            tracing::info!(agent = agent.name(), query_index = i, %query, "processing");

            let started = Instant::now();
            let response = agent.process(query).await;
            let latency_secs = started.elapsed().as_secs_f64();

            // Snapshot before reset; reset zeroes the collector, so each
            // record carries that query's counters alone.
            let metrics = agent.metrics();
            tracing::info!(
                agent = agent.name(),
                latency_secs,
                tokens = metrics.total_tokens,
                tool_calls = metrics.tool_calls_count,
                errors = metrics.error_count,
                "query complete"
            );

            queries.push(QueryRecord {
                query: (*query).to_string(),
                response: response.content,
                tool_calls: response.tool_calls,
                latency_secs,
                metrics,
            });

            agent.reset();
        }

        reports.push(aggregate(agent.name(), queries));
    }

    ComparisonReport {
        generated_at: chrono::Utc::now(),
        agents: reports,
    }
}

fn aggregate(name: &str, queries: Vec<QueryRecord>) -> AgentReport {
    let count = queries.len().max(1) as f64;
    let avg_latency_secs = queries.iter().map(|q| q.latency_secs).sum::<f64>() / count;
    let total_tokens = queries.iter().map(|q| q.metrics.total_tokens).sum();
    let total_tool_calls = queries.iter().map(|q| q.metrics.tool_calls_count).sum();
    let total_errors = queries.iter().map(|q| q.metrics.error_count).sum();

    AgentReport {
        name: name.to_string(),
        avg_latency_secs,
        total_tokens,
        total_tool_calls,
        total_errors,
        queries,
    }
}

/// Persist the report as pretty JSON
pub fn save_report(report: &ComparisonReport, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, serde_json::to_string_pretty(report)?)?;
    tracing::info!(path = %path.display(), "comparison results written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use agentmark_backends::ScriptedBackend;
    use agentmark_core::{OrchestratorConfig, ToolLoopAgent};
    use agentmark_tools::benchmark_registry;
    use std::sync::Arc;

    fn scripted_loop_agent() -> Box<dyn Agent> {
        let backend = ScriptedBackend::new();
        for i in 0..TEST_QUERIES.len() {
            backend.push_answer(format!("answer {i}"), 10);
        }
        Box::new(ToolLoopAgent::new(
            Arc::new(backend),
            Arc::new(benchmark_registry()),
            OrchestratorConfig::default(),
        ))
    }

    #[tokio::test]
    async fn test_report_covers_all_queries() {
        let mut agents = vec![scripted_loop_agent()];
        let report = run_comparison(&mut agents).await;

        assert_eq!(report.agents.len(), 1);
        let agent_report = &report.agents[0];
        assert_eq!(agent_report.name, "tool-loop");
        assert_eq!(agent_report.queries.len(), TEST_QUERIES.len());
        assert_eq!(agent_report.total_tokens, 50);
        assert_eq!(agent_report.total_errors, 0);
        assert!(agent_report.avg_latency_secs >= 0.0);
    }

    #[tokio::test]
    async fn test_per_query_metrics_are_independent() {
        let mut agents = vec![scripted_loop_agent()];
        let report = run_comparison(&mut agents).await;

        for record in &report.agents[0].queries {
            // Reset between queries keeps each snapshot per-query
            assert_eq!(record.metrics.total_tokens, 10);
        }
    }

    #[tokio::test]
    async fn test_save_report_round_trip() {
        let mut agents = vec![scripted_loop_agent()];
        let report = run_comparison(&mut agents).await;

        let dir = std::env::temp_dir().join("agentmark-test-results");
        let path = dir.join("comparison.json");
        save_report(&report, &path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["agents"][0]["name"], "tool-loop");
        std::fs::remove_dir_all(&dir).ok();
    }
}
