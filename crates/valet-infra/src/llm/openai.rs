//! OpenAiChatModel -- concrete [`ChatModel`] for OpenAI-compatible APIs.
//!
//! Sends requests to `/chat/completions` with bearer authentication.
//! The API key is wrapped in [`secrecy::SecretString`] and is never
//! logged or included in `Debug` output.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use valet_core::llm::provider::ChatModel;
use valet_types::llm::{LlmError, ModelTurn, ProviderMessage, ProviderRole, ToolCall};
use valet_types::tool::ToolSpec;

/// Chat-completion client for any OpenAI-compatible endpoint.
///
/// # API Key Security
///
/// Does NOT derive Debug; the key lives in a `SecretString` and is only
/// exposed when building the Authorization header.
pub struct OpenAiChatModel {
    client: reqwest::Client,
    api_key: SecretString,
    base_url: String,
    model: String,
}

impl OpenAiChatModel {
    /// Create a new client.
    ///
    /// `base_url` is the API root (e.g. `https://api.openai.com/v1`);
    /// the `/chat/completions` path is appended per request.
    pub fn new(api_key: SecretString, base_url: String, model: String) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .map_err(|e| LlmError::Http(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    fn build_request(&self, messages: &[ProviderMessage], tools: &[ToolSpec]) -> WireRequest {
        let tools: Vec<WireTool> = tools
            .iter()
            .map(|spec| WireTool {
                kind: "function",
                function: WireFunction {
                    name: spec.name.clone(),
                    description: spec.instruction.clone(),
                    parameters: spec.parameters.clone(),
                },
            })
            .collect();

        WireRequest {
            model: self.model.clone(),
            messages: messages.to_vec(),
            tool_choice: if tools.is_empty() { None } else { Some("auto") },
            tools,
        }
    }
}

impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.model
    }

    async fn invoke(
        &self,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelTurn, LlmError> {
        let body = self.build_request(messages, tools);

        let response = self
            .client
            .post(self.url())
            .bearer_auth(self.api_key.expose_secret())
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Http(format!("request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(LlmError::Provider(format!("HTTP {status}: {error_body}")));
        }

        let wire: WireResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Deserialization(format!("failed to parse response: {e}")))?;

        let choice = wire
            .choices
            .into_iter()
            .next()
            .ok_or(LlmError::EmptyResponse)?;

        debug!(
            model = %self.model,
            tool_calls = choice.message.tool_calls.len(),
            "completion received"
        );
        Ok(into_model_turn(choice.message))
    }
}

fn into_model_turn(message: WireMessage) -> ModelTurn {
    // Unknown roles default to assistant rather than failing the turn.
    let role = message
        .role
        .parse::<ProviderRole>()
        .unwrap_or(ProviderRole::Assistant);

    let tool_calls = message
        .tool_calls
        .into_iter()
        .map(|call| ToolCall {
            id: call.id,
            name: call.function.name,
            // Arguments arrive as a JSON-encoded string; keep the raw
            // text when it does not parse so the tool sees what the
            // model actually produced.
            arguments: serde_json::from_str(&call.function.arguments)
                .unwrap_or(serde_json::Value::String(call.function.arguments)),
        })
        .collect();

    ModelTurn {
        message: ProviderMessage::new(role, message.content.unwrap_or_default()),
        tool_calls,
    }
}

#[derive(Serialize)]
struct WireRequest {
    model: String,
    messages: Vec<ProviderMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Serialize)]
struct WireTool {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunction,
}

#[derive(Serialize)]
struct WireFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

#[derive(Deserialize)]
struct WireResponse {
    choices: Vec<WireChoice>,
}

#[derive(Deserialize)]
struct WireChoice {
    message: WireMessage,
}

#[derive(Deserialize)]
struct WireMessage {
    #[serde(default)]
    role: String,
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<WireToolCall>,
}

#[derive(Deserialize)]
struct WireToolCall {
    id: Option<String>,
    function: WireCalledFunction,
}

#[derive(Deserialize)]
struct WireCalledFunction {
    name: String,
    arguments: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_response_maps_to_reply() {
        let wire: WireResponse = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":"hello"}}]}"#,
        )
        .unwrap();
        let turn = into_model_turn(wire.choices.into_iter().next().unwrap().message);
        assert_eq!(turn.message.role, ProviderRole::Assistant);
        assert_eq!(turn.message.content, "hello");
        assert!(turn.tool_calls.is_empty());
    }

    #[test]
    fn test_tool_call_arguments_decoded() {
        let wire: WireResponse = serde_json::from_str(
            r#"{"choices":[{"message":{
                "role":"assistant","content":null,
                "tool_calls":[{"id":"call-1","type":"function",
                    "function":{"name":"run_cli","arguments":"{\"command\":\"date\"}"}}]
            }}]}"#,
        )
        .unwrap();
        let turn = into_model_turn(wire.choices.into_iter().next().unwrap().message);
        assert_eq!(turn.message.content, "");
        assert_eq!(turn.tool_calls.len(), 1);
        assert_eq!(turn.tool_calls[0].id.as_deref(), Some("call-1"));
        assert_eq!(
            turn.tool_calls[0].arguments,
            serde_json::json!({"command": "date"})
        );
    }

    #[test]
    fn test_unparseable_arguments_kept_as_raw_text() {
        let message = WireMessage {
            role: "assistant".to_string(),
            content: None,
            tool_calls: vec![WireToolCall {
                id: Some("x".to_string()),
                function: WireCalledFunction {
                    name: "run_cli".to_string(),
                    arguments: "not json".to_string(),
                },
            }],
        };
        let turn = into_model_turn(message);
        assert_eq!(
            turn.tool_calls[0].arguments,
            serde_json::Value::String("not json".to_string())
        );
    }

    #[test]
    fn test_unknown_role_defaults_to_assistant() {
        let message = WireMessage {
            role: "developer".to_string(),
            content: Some("hi".to_string()),
            tool_calls: Vec::new(),
        };
        let turn = into_model_turn(message);
        assert_eq!(turn.message.role, ProviderRole::Assistant);
    }

    #[test]
    fn test_request_omits_tools_when_empty() {
        let model = OpenAiChatModel::new(
            "key".to_string().into(),
            "https://api.openai.com/v1".to_string(),
            "gpt-4.1".to_string(),
        )
        .unwrap();
        let request = model.build_request(
            &[ProviderMessage::new(ProviderRole::User, "hi".to_string())],
            &[],
        );
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("tools").is_none());
        assert!(json.get("tool_choice").is_none());
    }

    #[test]
    fn test_request_advertises_tools() {
        let model = OpenAiChatModel::new(
            "key".to_string().into(),
            "https://api.openai.com/v1/".to_string(),
            "gpt-4.1".to_string(),
        )
        .unwrap();
        assert_eq!(model.url(), "https://api.openai.com/v1/chat/completions");

        let tools = vec![ToolSpec {
            name: "run_cli".to_string(),
            instruction: "Run a command".to_string(),
            parameters: serde_json::json!({"type": "object"}),
        }];
        let request = model.build_request(
            &[ProviderMessage::new(ProviderRole::User, "hi".to_string())],
            &tools,
        );
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["tool_choice"], "auto");
        assert_eq!(json["tools"][0]["type"], "function");
        assert_eq!(json["tools"][0]["function"]["name"], "run_cli");
    }
}
