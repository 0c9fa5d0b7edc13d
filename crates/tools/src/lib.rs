//! # agentmark-tools
//!
//! The three tools every benchmarked agent is given. Payload content is
//! mock (deterministic except for timestamps); the shapes are the contract
//! the orchestration loop and the backends are measured against.

pub mod calculator;
pub mod knowledge;
pub mod weather;

pub use calculator::CalculatorTool;
pub use knowledge::KnowledgeSearchTool;
pub use weather::WeatherTool;

use agentmark_core::ToolRegistry;

/// Registry holding the full benchmark tool set
pub fn benchmark_registry() -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(WeatherTool);
    registry.register(KnowledgeSearchTool);
    registry.register(CalculatorTool);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_benchmark_registry_contents() {
        let registry = benchmark_registry();
        assert_eq!(registry.len(), 3);
        assert!(registry.get("get_weather").is_some());
        assert!(registry.get("search_knowledge_base").is_some());
        assert!(registry.get("calculate").is_some());
    }
}
