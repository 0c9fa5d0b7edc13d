//! OpenAI-Compatible Backend
//!
//! Speaks the `/v1/chat/completions` wire format with native tool calling.
//! Every transport, auth, and decode fault collapses into
//! [`BackendResult::Failure`]; nothing unwinds past `complete`.

use std::collections::HashMap;
use std::time::Duration;

use agentmark_core::{
    backend::{BackendClient, BackendResult, GenerationOptions, TokenUsage},
    error::{AgentError, Result},
    tool::{ToolRequest, ToolSchema},
    turn::Turn,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Backend configuration.
///
/// Precedence: explicit construction beats environment variables
/// (`OPENAI_BASE_URL`, `OPENAI_API_KEY`), which beat the defaults below.
/// The model is not configured here; it travels in [`GenerationOptions`].
#[derive(Clone, Debug)]
pub struct OpenAiConfig {
    /// API base URL, without the `/chat/completions` suffix
    pub base_url: String,

    /// Bearer token
    pub api_key: String,

    /// Request timeout; expiry surfaces as a `Failure`, never a hang
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".into(),
            api_key: String::new(),
            timeout_secs: 120,
        }
    }
}

impl OpenAiConfig {
    pub fn from_env() -> Self {
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();

        Self {
            base_url,
            api_key,
            ..Default::default()
        }
    }
}

/// OpenAI-compatible chat-completions backend
pub struct OpenAiBackend {
    http: reqwest::Client,
    config: OpenAiConfig,
}

impl OpenAiBackend {
    /// Create from configuration
    pub fn from_config(config: OpenAiConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Create from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_config(OpenAiConfig::from_env())
    }

    /// Convert transcript turns to wire messages
    fn convert_turns(turns: &[Turn]) -> Vec<WireMessage> {
        turns
            .iter()
            .map(|turn| match turn {
                Turn::System { content } => WireMessage::text("system", content),
                Turn::User { content } => WireMessage::text("user", content),
                Turn::Assistant {
                    content,
                    tool_requests,
                } => WireMessage {
                    role: "assistant".into(),
                    content: content.clone(),
                    tool_calls: if tool_requests.is_empty() {
                        None
                    } else {
                        Some(tool_requests.iter().map(WireToolCall::from_request).collect())
                    },
                    tool_call_id: None,
                },
                Turn::Tool {
                    request_id,
                    content,
                } => WireMessage {
                    role: "tool".into(),
                    content: Some(content.clone()),
                    tool_calls: None,
                    tool_call_id: Some(request_id.clone()),
                },
            })
            .collect()
    }

    /// Convert tool schemas to the function-calling catalog
    fn convert_catalog(catalog: &[ToolSchema]) -> Vec<WireTool> {
        catalog
            .iter()
            .map(|schema| WireTool {
                tool_type: "function".into(),
                function: WireToolDef {
                    name: schema.name.clone(),
                    description: schema.description.clone(),
                    parameters: schema.parameters_json_schema(),
                },
            })
            .collect()
    }

    /// Convert a wire response to the loop's result type
    fn parse_reply(response: ChatResponse) -> BackendResult {
        let usage = response.usage.map(|u| TokenUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });

        let Some(choice) = response.choices.into_iter().next() else {
            return BackendResult::Failure {
                reason: "response carried no choices".into(),
            };
        };

        if let Some(calls) = choice.message.tool_calls.filter(|c| !c.is_empty()) {
            let mut requests = Vec::with_capacity(calls.len());
            for call in calls {
                let arguments: HashMap<String, serde_json::Value> =
                    match serde_json::from_str(&call.function.arguments) {
                        Ok(arguments) => arguments,
                        Err(e) => {
                            return BackendResult::Failure {
                                reason: format!(
                                    "malformed arguments for tool '{}': {e}",
                                    call.function.name
                                ),
                            };
                        }
                    };
                requests.push(
                    ToolRequest::new(call.function.name, arguments).with_id(call.id),
                );
            }
            return BackendResult::ToolUse { requests, usage };
        }

        BackendResult::Answer {
            content: choice.message.content.unwrap_or_default(),
            usage,
        }
    }
}

#[async_trait]
impl BackendClient for OpenAiBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);
        match self
            .http
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(e) => {
                tracing::warn!("backend health check failed: {e}");
                Ok(false)
            }
        }
    }

    async fn complete(
        &self,
        turns: &[Turn],
        catalog: &[ToolSchema],
        options: &GenerationOptions,
    ) -> BackendResult {
        let request = ChatRequest {
            model: &options.model,
            messages: Self::convert_turns(turns),
            temperature: options.temperature,
            max_tokens: options.max_tokens,
            top_p: options.top_p,
            stop: &options.stop_sequences,
            tools: if catalog.is_empty() {
                None
            } else {
                Some(Self::convert_catalog(catalog))
            },
            tool_choice: if catalog.is_empty() { None } else { Some("auto") },
        };

        let url = format!("{}/chat/completions", self.config.base_url);
        let response = match self
            .http
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                return BackendResult::Failure {
                    reason: format!("request failed: {e}"),
                };
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return BackendResult::Failure {
                reason: format!("HTTP {status}: {body}"),
            };
        }

        match response.json::<ChatResponse>().await {
            Ok(parsed) => Self::parse_reply(parsed),
            Err(e) => BackendResult::Failure {
                reason: format!("undecodable response: {e}"),
            },
        }
    }
}

// Wire format

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
    #[serde(skip_serializing_if = "<[_]>::is_empty")]
    stop: &'a [String],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'a str>,
}

#[derive(Serialize)]
struct WireMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
}

impl WireMessage {
    fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireToolCall {
    id: String,
    #[serde(rename = "type")]
    call_type: String,
    function: WireFunctionCall,
}

impl WireToolCall {
    fn from_request(request: &ToolRequest) -> Self {
        Self {
            id: request.id.clone(),
            call_type: "function".into(),
            function: WireFunctionCall {
                name: request.name.clone(),
                arguments: serde_json::to_string(&request.arguments)
                    .unwrap_or_else(|_| "{}".into()),
            },
        }
    }
}

#[derive(Serialize, Deserialize)]
struct WireFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: WireToolDef,
}

#[derive(Serialize)]
struct WireToolDef {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<WireUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Deserialize)]
struct WireUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
    total_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = OpenAiConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.timeout_secs, 120);
    }

    #[test]
    fn test_turn_conversion() {
        let mut arguments = HashMap::new();
        arguments.insert("location".to_string(), serde_json::json!("Boston"));
        let request = ToolRequest::new("get_weather", arguments).with_id("call-1");

        let turns = vec![
            Turn::system("You are helpful."),
            Turn::user("Weather in Boston?"),
            Turn::assistant_tool_use(None, vec![request]),
            Turn::tool_result("call-1", r#"{"result":{"temperature":72}}"#),
        ];

        let wire = OpenAiBackend::convert_turns(&turns);
        assert_eq!(wire.len(), 4);
        assert_eq!(wire[0].role, "system");
        assert_eq!(wire[2].role, "assistant");
        assert_eq!(
            wire[2].tool_calls.as_ref().unwrap()[0].function.name,
            "get_weather"
        );
        assert_eq!(wire[3].tool_call_id.as_deref(), Some("call-1"));
    }

    #[test]
    fn test_parse_answer_reply() {
        let raw = serde_json::json!({
            "choices": [{"message": {"content": "72 and sunny."}}],
            "usage": {"prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48}
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();

        match OpenAiBackend::parse_reply(response) {
            BackendResult::Answer { content, usage } => {
                assert_eq!(content, "72 and sunny.");
                assert_eq!(usage.unwrap().total_tokens, 48);
            }
            other => panic!("expected answer, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_tool_use_reply() {
        let raw = serde_json::json!({
            "choices": [{"message": {
                "content": null,
                "tool_calls": [{
                    "id": "call-9",
                    "type": "function",
                    "function": {
                        "name": "calculate",
                        "arguments": "{\"expression\": \"345 * 892\"}"
                    }
                }]
            }}],
            "usage": {"prompt_tokens": 60, "completion_tokens": 12, "total_tokens": 72}
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();

        match OpenAiBackend::parse_reply(response) {
            BackendResult::ToolUse { requests, .. } => {
                assert_eq!(requests.len(), 1);
                assert_eq!(requests[0].id, "call-9");
                assert_eq!(requests[0].name, "calculate");
                assert_eq!(
                    requests[0].arguments["expression"],
                    serde_json::json!("345 * 892")
                );
            }
            other => panic!("expected tool use, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_malformed_arguments_is_failure() {
        let raw = serde_json::json!({
            "choices": [{"message": {
                "tool_calls": [{
                    "id": "call-1",
                    "type": "function",
                    "function": {"name": "calculate", "arguments": "not json"}
                }]
            }}]
        });
        let response: ChatResponse = serde_json::from_value(raw).unwrap();

        assert!(matches!(
            OpenAiBackend::parse_reply(response),
            BackendResult::Failure { .. }
        ));
    }

    #[test]
    fn test_parse_empty_choices_is_failure() {
        let response: ChatResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            OpenAiBackend::parse_reply(response),
            BackendResult::Failure { .. }
        ));
    }
}
