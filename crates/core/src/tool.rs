//! Tool System
//!
//! Tool requests, outcomes, schemas, and the registry the orchestration
//! loop dispatches through. Dispatch never lets a tool fault escape: every
//! failure becomes an error-carrying [`ToolOutcome`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// A tool invocation requested by the backend
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolRequest {
    /// Request id, unique per assistant turn
    pub id: String,

    /// Tool identifier
    pub name: String,

    /// Structured arguments as key-value pairs
    pub arguments: HashMap<String, serde_json::Value>,
}

impl ToolRequest {
    pub fn new(
        name: impl Into<String>,
        arguments: HashMap<String, serde_json::Value>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            arguments,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }
}

/// Result of one tool dispatch: exactly one of `result`/`error` is set
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolOutcome {
    /// Tool that was dispatched
    pub name: String,

    /// Structured output on success
    pub result: Option<serde_json::Value>,

    /// Error message on failure
    pub error: Option<String>,
}

impl ToolOutcome {
    pub fn ok(name: impl Into<String>, result: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            result: Some(result),
            error: None,
        }
    }

    pub fn err(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Serialize for embedding in a `Tool` turn. The backend sees failures
    /// as conversational content and may recover on the next iteration.
    pub fn to_turn_content(&self) -> String {
        serde_json::json!({
            "result": self.result,
            "error": self.error,
        })
        .to_string()
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,
}

impl ParameterSchema {
    pub fn required(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: true,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        param_type: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
            description: description.into(),
            required: false,
        }
    }
}

/// Tool definition advertised to the backend in the tool catalog
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to the backend)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

impl ToolSchema {
    /// Render parameters as a JSON-Schema object, the shape function-calling
    /// APIs expect under `function.parameters`.
    pub fn parameters_json_schema(&self) -> serde_json::Value {
        let mut properties = serde_json::Map::new();
        let mut required = Vec::new();

        for param in &self.parameters {
            properties.insert(
                param.name.clone(),
                serde_json::json!({
                    "type": param.param_type,
                    "description": param.description,
                }),
            );
            if param.required {
                required.push(serde_json::Value::String(param.name.clone()));
            }
        }

        serde_json::json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for the catalog
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: &HashMap<String, serde_json::Value>)
        -> Result<serde_json::Value>;

    /// Validate arguments before execution (optional)
    fn validate(&self, arguments: &HashMap<String, serde_json::Value>) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            if param.required && !arguments.contains_key(&param.name) {
                return Err(AgentError::InvalidToolInput(format!(
                    "missing required parameter: {}",
                    param.name
                )));
            }
        }

        Ok(())
    }
}

/// Registry for available tools, resolved once at startup
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name.clone(), Arc::new(tool));
    }

    /// Register a shared tool
    pub fn register_shared(&mut self, tool: Arc<dyn Tool>) {
        let schema = tool.schema();
        self.tools.insert(schema.name, tool);
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Dispatch a tool request. Unknown names and execution faults come
    /// back as error outcomes, never as panics or `Err`.
    pub async fn dispatch(&self, request: &ToolRequest) -> ToolOutcome {
        let Some(tool) = self.get(&request.name) else {
            return ToolOutcome::err(
                &request.name,
                AgentError::ToolNotFound(request.name.clone()).to_string(),
            );
        };

        if let Err(e) = tool.validate(&request.arguments) {
            return ToolOutcome::err(&request.name, e.to_string());
        }

        match tool.execute(&request.arguments).await {
            Ok(result) => ToolOutcome::ok(&request.name, result),
            Err(e) => ToolOutcome::err(&request.name, e.to_string()),
        }
    }

    /// All tool schemas (the catalog advertised to the backend)
    pub fn catalog(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    /// Registered tool names
    pub fn names(&self) -> Vec<&str> {
        self.tools.keys().map(|s| s.as_str()).collect()
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool;

    #[async_trait]
    impl Tool for EchoTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "echo".into(),
                description: "Echo the input back".into(),
                parameters: vec![ParameterSchema::required(
                    "text",
                    "string",
                    "Text to echo",
                )],
            }
        }

        async fn execute(
            &self,
            arguments: &HashMap<String, serde_json::Value>,
        ) -> Result<serde_json::Value> {
            let text = arguments
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| AgentError::InvalidToolInput("text must be a string".into()))?;
            Ok(serde_json::json!({ "echo": text }))
        }
    }

    fn args(pairs: &[(&str, serde_json::Value)]) -> HashMap<String, serde_json::Value> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[tokio::test]
    async fn test_dispatch_success() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let request =
            ToolRequest::new("echo", args(&[("text", serde_json::json!("hi"))]));
        let outcome = registry.dispatch(&request).await;

        assert!(!outcome.is_error());
        assert_eq!(outcome.result.unwrap()["echo"], "hi");
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool() {
        let registry = ToolRegistry::new();
        let request = ToolRequest::new("nope", HashMap::new());

        let outcome = registry.dispatch(&request).await;
        assert!(outcome.is_error());
        assert!(outcome.error.unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn test_dispatch_missing_required_argument() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let request = ToolRequest::new("echo", HashMap::new());
        let outcome = registry.dispatch(&request).await;

        assert!(outcome.is_error());
        assert!(!outcome.error.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_invalid_argument_type() {
        let mut registry = ToolRegistry::new();
        registry.register(EchoTool);

        let request =
            ToolRequest::new("echo", args(&[("text", serde_json::json!(42))]));
        let outcome = registry.dispatch(&request).await;

        assert!(outcome.is_error());
    }

    #[test]
    fn test_parameters_json_schema() {
        let schema = EchoTool.schema();
        let json = schema.parameters_json_schema();

        assert_eq!(json["type"], "object");
        assert_eq!(json["properties"]["text"]["type"], "string");
        assert_eq!(json["required"][0], "text");
    }

    #[test]
    fn test_outcome_turn_content_shape() {
        let ok = ToolOutcome::ok("echo", serde_json::json!({"echo": "hi"}));
        let content: serde_json::Value =
            serde_json::from_str(&ok.to_turn_content()).unwrap();
        assert!(content["error"].is_null());
        assert_eq!(content["result"]["echo"], "hi");
    }
}
