//! The iterative tool-calling loop.
//!
//! One chat turn may take several provider rounds: the model asks for
//! tools, the loop runs them and feeds results back, and the turn ends
//! when a round comes back with no tool calls. The loop is a plain
//! `loop` over `(messages, round)` state; there is no cap on rounds, so
//! termination is the model's responsibility.

use tracing::{debug, warn};

use valet_types::llm::{LlmError, ProviderMessage, ProviderRole, Tokens};

use crate::llm::provider::ChatModel;
use crate::llm::tokens::{TokenCounter, add_tokens, estimate_request, estimate_response};
use crate::tool::registry::{ToolRegistry, render_tool_output};

/// Diagnostic fed to the model when it requests a tool the loop cannot
/// correlate or find.
const BAD_TOOL_CALL: &str = "Tool not found or tool call ID is missing.";

/// Run the tool loop to completion for one chat turn.
///
/// Returns the final assistant message together with the estimated token
/// cost of every round in the turn. The estimate is `None` when the
/// counter cannot cover the active model.
///
/// Tool calls within a round execute sequentially, in the order the
/// model listed them, and every call gets a correlated result message.
/// A failing tool does not abort the turn; its error text becomes the
/// tool result. A provider error does abort the turn.
pub async fn run_tool_loop<M, C>(
    model: &M,
    counter: &C,
    registry: &ToolRegistry,
    mut messages: Vec<ProviderMessage>,
) -> Result<(ProviderMessage, Tokens), LlmError>
where
    M: ChatModel,
    C: TokenCounter,
{
    let tools = registry.specs();
    let mut used: Tokens = Some(0);
    let mut round: u32 = 0;

    loop {
        round += 1;
        used = add_tokens(used, estimate_request(counter, tools, &messages));

        let turn = model.invoke(&messages, tools).await?;
        used = add_tokens(used, estimate_response(counter, &turn.message));

        debug!(
            round,
            tool_calls = turn.tool_calls.len(),
            "model turn received"
        );

        messages.push(turn.message.clone());

        if turn.tool_calls.is_empty() {
            return Ok((turn.message, used));
        }

        for call in &turn.tool_calls {
            let (tool, call_id) = match (registry.get(&call.name), &call.id) {
                (Some(tool), Some(id)) => (tool, id.clone()),
                _ => {
                    warn!(tool = %call.name, "unresolvable tool call");
                    messages.push(ProviderMessage::new(
                        ProviderRole::Assistant,
                        BAD_TOOL_CALL.to_string(),
                    ));
                    continue;
                }
            };

            let content = match tool.execute(call.arguments.clone()).await {
                Ok(output) => render_tool_output(&output),
                Err(err) => {
                    warn!(tool = %call.name, error = %err, "tool failed");
                    err.to_string()
                }
            };
            messages.push(ProviderMessage::tool_result(content, call_id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use valet_types::llm::{ModelTurn, ToolCall};
    use valet_types::tool::{ToolError, ToolSpec};

    use crate::tool::registry::Tool;

    /// Replays a fixed sequence of turns and records every request.
    struct ScriptedModel {
        turns: Mutex<std::collections::VecDeque<ModelTurn>>,
        requests: Mutex<Vec<Vec<ProviderMessage>>>,
    }

    impl ScriptedModel {
        fn new(turns: Vec<ModelTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    impl ChatModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn invoke(
            &self,
            messages: &[ProviderMessage],
            _tools: &[ToolSpec],
        ) -> Result<ModelTurn, LlmError> {
            self.requests.lock().unwrap().push(messages.to_vec());
            self.turns
                .lock()
                .unwrap()
                .pop_front()
                .ok_or(LlmError::EmptyResponse)
        }
    }

    struct Shout;

    impl Tool for Shout {
        fn spec(&self) -> &ToolSpec {
            static SPEC: std::sync::OnceLock<ToolSpec> = std::sync::OnceLock::new();
            SPEC.get_or_init(|| ToolSpec {
                name: "shout".to_string(),
                instruction: "Uppercase text".to_string(),
                parameters: serde_json::json!({"type": "object"}),
            })
        }

        async fn execute(
            &self,
            arguments: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            let text = arguments
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| ToolError::new("no text"))?;
            Ok(serde_json::Value::String(text.to_uppercase()))
        }
    }

    struct CharCounter;

    impl TokenCounter for CharCounter {
        fn count(&self, text: &str) -> Tokens {
            Some(text.len() as u64)
        }
    }

    struct UnknownCounter;

    impl TokenCounter for UnknownCounter {
        fn count(&self, _text: &str) -> Tokens {
            None
        }
    }

    fn user(text: &str) -> ProviderMessage {
        ProviderMessage::new(ProviderRole::User, text.to_string())
    }

    fn tool_call(id: Option<&str>, name: &str, args: serde_json::Value) -> ToolCall {
        ToolCall {
            id: id.map(str::to_string),
            name: name.to_string(),
            arguments: args,
        }
    }

    #[tokio::test]
    async fn test_plain_reply_ends_after_one_round() {
        let model = ScriptedModel::new(vec![ModelTurn::reply("hello")]);
        let registry = ToolRegistry::new();

        let (reply, used) = run_tool_loop(&model, &CharCounter, &registry, vec![user("hi")])
            .await
            .unwrap();
        assert_eq!(reply.content, "hello");
        assert!(used.is_some());
        assert_eq!(model.requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_tool_round_feeds_result_back() {
        let mut first = ModelTurn::reply("");
        first.tool_calls = vec![tool_call(
            Some("call-1"),
            "shout",
            serde_json::json!({"text": "hi"}),
        )];
        let model = ScriptedModel::new(vec![first, ModelTurn::reply("done")]);

        let mut registry = ToolRegistry::new();
        registry.register(Shout);

        let (reply, _) = run_tool_loop(&model, &CharCounter, &registry, vec![user("shout hi")])
            .await
            .unwrap();
        assert_eq!(reply.content, "done");

        // Second request must contain the correlated tool result.
        let requests = model.requests.lock().unwrap();
        let second = &requests[1];
        let result = second
            .iter()
            .find(|m| m.role == ProviderRole::Tool)
            .unwrap();
        assert_eq!(result.content, "HI");
        assert_eq!(result.tool_call_id.as_deref(), Some("call-1"));
    }

    #[tokio::test]
    async fn test_multiple_calls_answered_in_order() {
        let mut first = ModelTurn::reply("");
        first.tool_calls = vec![
            tool_call(Some("a"), "shout", serde_json::json!({"text": "one"})),
            tool_call(Some("b"), "shout", serde_json::json!({"text": "two"})),
        ];
        let model = ScriptedModel::new(vec![first, ModelTurn::reply("ok")]);

        let mut registry = ToolRegistry::new();
        registry.register(Shout);

        run_tool_loop(&model, &CharCounter, &registry, vec![user("go")])
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        let ids: Vec<_> = requests[1]
            .iter()
            .filter(|m| m.role == ProviderRole::Tool)
            .map(|m| m.tool_call_id.clone().unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_unknown_tool_gets_diagnostic() {
        let mut first = ModelTurn::reply("");
        first.tool_calls = vec![tool_call(Some("x"), "missing", serde_json::json!({}))];
        let model = ScriptedModel::new(vec![first, ModelTurn::reply("ok")]);
        let registry = ToolRegistry::new();

        run_tool_loop(&model, &CharCounter, &registry, vec![user("go")])
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        let diagnostic = requests[1]
            .iter()
            .find(|m| m.content == BAD_TOOL_CALL)
            .unwrap();
        assert_eq!(diagnostic.role, ProviderRole::Assistant);
        assert!(diagnostic.tool_call_id.is_none());
    }

    #[tokio::test]
    async fn test_missing_call_id_gets_diagnostic() {
        let mut first = ModelTurn::reply("");
        first.tool_calls = vec![tool_call(None, "shout", serde_json::json!({"text": "hi"}))];
        let model = ScriptedModel::new(vec![first, ModelTurn::reply("ok")]);

        let mut registry = ToolRegistry::new();
        registry.register(Shout);

        run_tool_loop(&model, &CharCounter, &registry, vec![user("go")])
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        assert!(requests[1].iter().any(|m| m.content == BAD_TOOL_CALL));
        assert!(!requests[1].iter().any(|m| m.role == ProviderRole::Tool));
    }

    #[tokio::test]
    async fn test_tool_failure_becomes_result_text() {
        let mut first = ModelTurn::reply("");
        first.tool_calls = vec![tool_call(Some("c"), "shout", serde_json::json!({}))];
        let model = ScriptedModel::new(vec![first, ModelTurn::reply("ok")]);

        let mut registry = ToolRegistry::new();
        registry.register(Shout);

        run_tool_loop(&model, &CharCounter, &registry, vec![user("go")])
            .await
            .unwrap();

        let requests = model.requests.lock().unwrap();
        let result = requests[1]
            .iter()
            .find(|m| m.role == ProviderRole::Tool)
            .unwrap();
        assert_eq!(result.content, "no text");
        assert_eq!(result.tool_call_id.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_provider_error_aborts_turn() {
        let model = ScriptedModel::new(vec![]);
        let registry = ToolRegistry::new();

        let err = run_tool_loop(&model, &CharCounter, &registry, vec![user("hi")])
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_unknown_counter_poisons_usage() {
        let model = ScriptedModel::new(vec![ModelTurn::reply("hello")]);
        let registry = ToolRegistry::new();

        let (_, used) = run_tool_loop(&model, &UnknownCounter, &registry, vec![user("hi")])
            .await
            .unwrap();
        assert!(used.is_none());
    }
}
