//! Weather Tool
//!
//! Mock weather lookup. Deterministic apart from the timestamp.

use std::collections::HashMap;

use agentmark_core::{
    error::{AgentError, Result},
    tool::{ParameterSchema, Tool, ToolSchema},
};
use async_trait::async_trait;

/// Tool returning mock current-weather data for a location
pub struct WeatherTool;

#[async_trait]
impl Tool for WeatherTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_weather".into(),
            description: "Get the current weather for a location".into(),
            parameters: vec![ParameterSchema::required(
                "location",
                "string",
                "The location to get weather for",
            )],
        }
    }

    async fn execute(
        &self,
        arguments: &HashMap<String, serde_json::Value>,
    ) -> Result<serde_json::Value> {
        let location = arguments
            .get("location")
            .and_then(|v| v.as_str())
            .ok_or_else(|| AgentError::InvalidToolInput("location must be a string".into()))?;

        Ok(serde_json::json!({
            "location": location,
            "temperature": 72,
            "conditions": "sunny",
            "humidity": 45,
            "wind_speed": 5,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_weather_payload_shape() {
        let mut arguments = HashMap::new();
        arguments.insert("location".to_string(), serde_json::json!("Boston"));

        let payload = WeatherTool.execute(&arguments).await.unwrap();
        assert_eq!(payload["location"], "Boston");
        assert_eq!(payload["temperature"], 72);
        assert_eq!(payload["conditions"], "sunny");
        assert!(payload["timestamp"].is_string());
    }

    #[tokio::test]
    async fn test_weather_rejects_non_string_location() {
        let mut arguments = HashMap::new();
        arguments.insert("location".to_string(), serde_json::json!(42));

        let result = WeatherTool.execute(&arguments).await;
        assert!(matches!(result, Err(AgentError::InvalidToolInput(_))));
    }
}
