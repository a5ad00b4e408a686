//! OpenAI-compatible chat backend (vLLM, Ollama `/v1`, llama.cpp server).
//!
//! ```text
//! POST {base_url}/chat/completions
//!   { model, messages, temperature, max_tokens, [stop], [tools, tool_choice] }
//!
//! choices[0].message.content     → ContentBlock::Text
//! choices[0].message.tool_calls  → ContentBlock::ToolUse (arguments kept raw)
//! ```
//!
//! `Tool` turns go out as `user` messages prefixed `Observation: ` so the
//! same conversation works against text-only backends.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use toolbox_application::ports::llm_gateway::{GatewayError, LlmGateway};
use toolbox_domain::{ContentBlock, LlmResponse, Message, Role, StopReason, ToolDescriptor};
use tracing::{debug, info};

/// Stop sequences sent by default. They keep a text-mode model from writing
/// its own `Observation:` (and then an `Answer:`) after an action.
pub const DEFAULT_STOP: [&str; 2] = ["Observation:", "\nQuestion:"];

/// Connection settings for an OpenAI-compatible server.
#[derive(Debug, Clone, PartialEq)]
pub struct OpenAiCompatConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Stop sequences; empty sends none.
    pub stop: Vec<String>,
    pub timeout: Duration,
}

impl Default for OpenAiCompatConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000/v1".to_string(),
            model: "llama3".to_string(),
            api_key: None,
            temperature: 0.0,
            max_tokens: 1024,
            stop: DEFAULT_STOP.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(120),
        }
    }
}

pub struct OpenAiCompatGateway {
    client: reqwest::Client,
    config: OpenAiCompatConfig,
}

impl OpenAiCompatGateway {
    pub fn new(config: OpenAiCompatConfig) -> Result<Self, GatewayError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::Other(format!("Failed to build HTTP client: {}", e)))?;

        info!(base_url = %config.base_url, model = %config.model, "OpenAI-compatible backend configured");
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &OpenAiCompatConfig {
        &self.config
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => request.bearer_auth(key),
            None => request,
        }
    }

    fn build_request<'a>(
        &'a self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> ChatRequest<'a> {
        let tools: Vec<Value> = tools.iter().map(ToolDescriptor::to_function_tool).collect();
        ChatRequest {
            model: &self.config.model,
            messages: to_wire_messages(messages),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
            stop: &self.config.stop,
            tool_choice: (!tools.is_empty()).then_some("auto"),
            tools,
        }
    }
}

#[async_trait]
impl LlmGateway for OpenAiCompatGateway {
    async fn chat(
        &self,
        messages: &[Message],
        tools: &[ToolDescriptor],
    ) -> Result<LlmResponse, GatewayError> {
        let body = self.build_request(messages, tools);
        debug!(
            messages = messages.len(),
            tools = tools.len(),
            model = %self.config.model,
            "Sending chat completion"
        );

        let response = self
            .authorize(self.client.post(self.endpoint("chat/completions")))
            .json(&body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let text = response.text().await.map_err(map_reqwest_error)?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(GatewayError::ModelNotAvailable(format!(
                "{} ({})",
                self.config.model,
                text.trim()
            )));
        }
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}: {}",
                status.as_u16(),
                text.trim()
            )));
        }

        let parsed: ChatResponse = serde_json::from_str(&text)
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        parse_response(parsed)
    }

    async fn available_models(&self) -> Result<Vec<String>, GatewayError> {
        let response = self
            .authorize(self.client.get(self.endpoint("models")))
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(format!(
                "HTTP {}",
                status.as_u16()
            )));
        }

        let list: ModelList = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        Ok(list.data.into_iter().map(|m| m.id).collect())
    }
}

fn map_reqwest_error(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else if e.is_connect() {
        GatewayError::ConnectionError(e.to_string())
    } else {
        GatewayError::RequestFailed(e.to_string())
    }
}

// ==================== Wire types ====================

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage>,
    temperature: f32,
    max_tokens: u32,
    #[serde(skip_serializing_if = "<[String]>::is_empty")]
    stop: &'a [String],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
struct WireMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
    // Some servers send `"tool_calls": null`.
    #[serde(default)]
    tool_calls: Option<Vec<WireToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireToolCall {
    #[serde(default)]
    id: Option<String>,
    function: WireFunction,
}

#[derive(Debug, Deserialize)]
struct WireFunction {
    #[serde(default)]
    name: String,
    #[serde(default)]
    arguments: Value,
}

#[derive(Debug, Deserialize)]
struct ModelList {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

fn to_wire_messages(messages: &[Message]) -> Vec<WireMessage> {
    messages
        .iter()
        .map(|m| match m.role {
            Role::System => WireMessage {
                role: "system",
                content: m.content.clone(),
            },
            Role::User => WireMessage {
                role: "user",
                content: m.content.clone(),
            },
            Role::Assistant => WireMessage {
                role: "assistant",
                content: m.content.clone(),
            },
            Role::Tool => WireMessage {
                role: "user",
                content: format!("Observation: {}", m.content),
            },
        })
        .collect()
}

fn parse_response(response: ChatResponse) -> Result<LlmResponse, GatewayError> {
    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GatewayError::InvalidResponse("Response has no choices".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = choice.message.content
        && !text.is_empty()
    {
        content.push(ContentBlock::Text(text));
    }
    for (index, call) in choice
        .message
        .tool_calls
        .unwrap_or_default()
        .into_iter()
        .enumerate() {
        content.push(ContentBlock::ToolUse {
            id: call.id.unwrap_or_else(|| format!("call_{}", index)),
            name: call.function.name,
            input: call.function.arguments,
        });
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice
            .finish_reason
            .as_deref()
            .map(StopReason::from_finish_reason),
        model: response.model,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn gateway() -> OpenAiCompatGateway {
        OpenAiCompatGateway::new(OpenAiCompatConfig {
            base_url: "http://localhost:11434/v1/".into(),
            model: "qwen2.5".into(),
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn test_endpoint_joins_paths() {
        assert_eq!(
            gateway().endpoint("chat/completions"),
            "http://localhost:11434/v1/chat/completions"
        );
    }

    #[test]
    fn test_tool_turns_become_observations() {
        let wire = to_wire_messages(&[
            Message::system("sys"),
            Message::user("q"),
            Message::assistant("Action: calculator"),
            Message::tool("Result: 4"),
        ]);
        let roles: Vec<_> = wire.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["system", "user", "assistant", "user"]);
        assert_eq!(wire[3].content, "Observation: Result: 4");
    }

    #[test]
    fn test_request_without_tools_omits_tool_fields() {
        let gw = gateway();
        let body = serde_json::to_value(gw.build_request(&[Message::user("hi")], &[])).unwrap();
        assert_eq!(body["model"], "qwen2.5");
        assert!(body.get("tools").is_none());
        assert!(body.get("tool_choice").is_none());
    }

    #[test]
    fn test_request_carries_stop_sequences() {
        let body = serde_json::to_value(gateway().build_request(&[Message::user("hi")], &[])).unwrap();
        assert_eq!(body["stop"], json!(["Observation:", "\nQuestion:"]));

        let gw = OpenAiCompatGateway::new(OpenAiCompatConfig {
            stop: Vec::new(),
            ..Default::default()
        })
        .unwrap();
        let body = serde_json::to_value(gw.build_request(&[Message::user("hi")], &[])).unwrap();
        assert!(body.get("stop").is_none());
    }

    #[test]
    fn test_request_with_tools() {
        let gw = gateway();
        let tools = vec![ToolDescriptor {
            name: "calculator".into(),
            description: "Math".into(),
            parameters: json!({"type": "object", "properties": {}}),
        }];
        let body = serde_json::to_value(gw.build_request(&[Message::user("hi")], &tools)).unwrap();
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["type"], "function");
        assert_eq!(body["tools"][0]["function"]["name"], "calculator");
    }

    #[test]
    fn test_parse_text_response() {
        let raw: ChatResponse = serde_json::from_value(json!({
            "model": "qwen2.5",
            "choices": [{
                "message": {"role": "assistant", "content": "Answer: 4"},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let response = parse_response(raw).unwrap();
        assert_eq!(response.text_content(), "Answer: 4");
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(response.model.as_deref(), Some("qwen2.5"));
    }

    #[test]
    fn test_parse_tool_call_response_keeps_raw_arguments() {
        let raw: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [
                        {"id": "call_9", "type": "function",
                         "function": {"name": "calculator", "arguments": "{\"expression\": \"2+2\"}"}},
                        {"type": "function",
                         "function": {"name": "search", "arguments": {"query": "rust"}}}
                    ]
                },
                "finish_reason": "tool_calls"
            }]
        }))
        .unwrap();

        let response = parse_response(raw).unwrap();
        let uses: Vec<_> = response.tool_uses().collect();
        assert_eq!(uses.len(), 2);
        assert_eq!(uses[0].0, "call_9");
        assert_eq!(uses[0].2, &json!("{\"expression\": \"2+2\"}"));
        assert_eq!(uses[1].0, "call_1");
        assert_eq!(uses[1].2, &json!({"query": "rust"}));
        assert_eq!(response.stop_reason, Some(StopReason::ToolUse));
    }

    #[test]
    fn test_parse_null_tool_calls() {
        let raw: ChatResponse = serde_json::from_value(json!({
            "choices": [{
                "message": {"role": "assistant", "content": "Answer: 4", "tool_calls": null},
                "finish_reason": "stop"
            }]
        }))
        .unwrap();

        let response = parse_response(raw).unwrap();
        assert!(!response.has_tool_calls());
        assert_eq!(response.text_content(), "Answer: 4");
    }

    #[test]
    fn test_parse_empty_choices() {
        let raw: ChatResponse = serde_json::from_value(json!({"choices": []})).unwrap();
        assert!(matches!(
            parse_response(raw),
            Err(GatewayError::InvalidResponse(_))
        ));
    }
}
