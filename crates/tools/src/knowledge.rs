//! Knowledge Search Tool
//!
//! Mock knowledge-base search returning ranked sample articles.

use std::collections::HashMap;

use agentmark_core::{
    error::{AgentError, Result},
    tool::{ParameterSchema, Tool, ToolSchema},
};
use async_trait::async_trait;

const DEFAULT_MAX_RESULTS: usize = 3;

/// Tool returning mock search results for a query
pub struct KnowledgeSearchTool;

#[async_trait]
impl Tool for KnowledgeSearchTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "search_knowledge_base".into(),
            description: "Search a knowledge base for information".into(),
            parameters: vec![
                ParameterSchema::required("query", "string", "The search query"),
                ParameterSchema::optional(
                    "max_results",
                    "integer",
                    "Maximum number of results to return",
                ),
            ],
        }
    }

    async fn execute(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let query = arguments
            .get("query")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::InvalidToolInput("query must be a string".into()))?;

        let max_results = arguments
            .get("max_results")
            .and_then(serde_json::Value::as_u64)
            .map_or(DEFAULT_MAX_RESULTS, |n| n as usize);

        let results = vec![
            serde_json::json!({
                "title": "Sample article 1",
                "content": format!("This is a sample article about {query}"),
                "relevance": 0.95,
            }),
            serde_json::json!({
                "title": "Sample article 2",
                "content": format!("Another article related to {query}"),
                "relevance": 0.82,
            }),
            serde_json::json!({
                "title": "Sample article 3",
                "content": format!("Additional information about {query}"),
                "relevance": 0.67,
            }),
            serde_json::json!({
                "title": "Sample article 4",
                "content": format!("Somewhat related to {query}"),
                "relevance": 0.45,
            }),
        ];

        let truncated: Vec<_> = results.into_iter().take(max_results).collect();
        Ok(serde_json::Value::Array(truncated))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(query: &str, max_results: Option<u64>) -> HashMap<String, serde_json::Value> {
        let mut arguments = HashMap::new();
        arguments.insert("query".to_string(), serde_json::json!(query));
        if let Some(n) = max_results {
            arguments.insert("max_results".to_string(), serde_json::json!(n));
        }
        arguments
    }

    #[tokio::test]
    async fn test_default_result_count() {
        let payload = KnowledgeSearchTool
            .execute(&args("artificial intelligence", None))
            .await
            .unwrap();
        let results = payload.as_array().unwrap();
        assert_eq!(results.len(), 3);
        assert!(
            results[0]["content"]
                .as_str()
                .unwrap()
                .contains("artificial intelligence")
        );
    }

    #[tokio::test]
    async fn test_max_results_caps_output() {
        let payload = KnowledgeSearchTool
            .execute(&args("rust", Some(2)))
            .await
            .unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_max_results_beyond_catalog() {
        let payload = KnowledgeSearchTool
            .execute(&args("rust", Some(10)))
            .await
            .unwrap();
        assert_eq!(payload.as_array().unwrap().len(), 4);
    }
}
