//! agentmark comparison harness
//!
//! Runs every orchestration strategy over the same query suite and writes
//! a JSON results file. Backend selection via `AGENTMARK_BACKEND`:
//! `scripted` (default, deterministic offline replies) or `openai` (any
//! OpenAI-compatible endpoint, configured by env).

mod graph;
mod runner;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agentmark_backends::{OpenAiBackend, ScriptedBackend};
use agentmark_core::{Agent, BackendClient, OrchestratorConfig, ToolLoopAgent};
use agentmark_tools::benchmark_registry;

use crate::graph::StepGraphAgent;
use crate::runner::{run_comparison, save_report};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    let mode = std::env::var("AGENTMARK_BACKEND").unwrap_or_else(|_| "scripted".into());
    let config = orchestrator_config_from_env();

    let mut agents: Vec<Box<dyn Agent>> = Vec::new();
    if mode == "openai" {
        let backend = Arc::new(OpenAiBackend::from_env()?);
        match backend.health_check().await {
            Ok(true) => tracing::info!("backend reachable"),
            Ok(false) | Err(_) => {
                tracing::warn!("backend not reachable - every query will surface a failure");
            }
        }

        agents.push(Box::new(ToolLoopAgent::new(
            backend.clone(),
            Arc::new(benchmark_registry()),
            config.clone(),
        )));
        agents.push(Box::new(StepGraphAgent::new(
            backend,
            Arc::new(benchmark_registry()),
            config,
        )));
    } else {
        tracing::info!("using scripted backend (set AGENTMARK_BACKEND=openai for live runs)");
        agents.push(Box::new(ToolLoopAgent::new(
            Arc::new(demo_backend()),
            Arc::new(benchmark_registry()),
            config.clone(),
        )));
        agents.push(Box::new(StepGraphAgent::new(
            Arc::new(demo_backend()),
            Arc::new(benchmark_registry()),
            config,
        )));
    }

    let report = run_comparison(&mut agents).await;

    for agent in &report.agents {
        tracing::info!(
            name = %agent.name,
            avg_latency_secs = agent.avg_latency_secs,
            total_tokens = agent.total_tokens,
            total_tool_calls = agent.total_tool_calls,
            total_errors = agent.total_errors,
            "agent summary"
        );
    }

    let path = PathBuf::from(
        std::env::var("RESULTS_PATH").unwrap_or_else(|_| "results/comparison.json".into()),
    );
    save_report(&report, &path)?;

    Ok(())
}

fn orchestrator_config_from_env() -> OrchestratorConfig {
    let mut config = OrchestratorConfig::default();
    if let Ok(model) = std::env::var("DEFAULT_MODEL") {
        config.generation.model = model;
    }
    config
}

/// Scripted replies matching [`runner::TEST_QUERIES`], each query one
/// tool round followed by a final answer
fn demo_backend() -> ScriptedBackend {
    fn args(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    let backend = ScriptedBackend::new();

    backend.push_tool_use(
        "get_weather",
        args(&[("location", serde_json::json!("Boston"))]),
        62,
    );
    backend.push_answer("It's currently 72F and sunny in Boston.", 40);

    backend.push_tool_use(
        "calculate",
        args(&[("expression", serde_json::json!("345 * 892"))]),
        58,
    );
    backend.push_answer("345 * 892 = 307740.", 35);

    backend.push_tool_use(
        "search_knowledge_base",
        args(&[("query", serde_json::json!("artificial intelligence"))]),
        64,
    );
    backend.push_answer(
        "I found three articles about artificial intelligence in the knowledge base.",
        48,
    );

    backend.push_tool_use(
        "calculate",
        args(&[("expression", serde_json::json!("840 * 0.25"))]),
        55,
    );
    backend.push_answer("25% of 840 is 210.", 30);

    backend.push_tool_use(
        "get_weather",
        args(&[("location", serde_json::json!("Paris"))]),
        70,
    );
    backend.push_answer(
        "The capital of France is Paris, where it is currently 72F and sunny.",
        52,
    );

    backend
}
