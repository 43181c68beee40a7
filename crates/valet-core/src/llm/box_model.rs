//! BoxChatModel -- object-safe dynamic dispatch wrapper for ChatModel.
//!
//! 1. Define an object-safe `ChatModelDyn` trait with boxed futures
//! 2. Blanket-impl `ChatModelDyn` for all `T: ChatModel`
//! 3. `BoxChatModel` wraps `Box<dyn ChatModelDyn>` and delegates

use std::future::Future;
use std::pin::Pin;

use valet_types::llm::{LlmError, ModelTurn, ProviderMessage};
use valet_types::tool::ToolSpec;

use super::provider::ChatModel;

/// Object-safe version of [`ChatModel`] with boxed futures.
///
/// This trait exists solely to enable dynamic dispatch (`dyn ChatModelDyn`).
/// A blanket implementation is provided for all types implementing `ChatModel`.
pub trait ChatModelDyn: Send + Sync {
    fn name(&self) -> &str;

    fn invoke_boxed<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
    ) -> Pin<Box<dyn Future<Output = Result<ModelTurn, LlmError>> + Send + 'a>>;
}

/// Blanket implementation: any `ChatModel` automatically implements `ChatModelDyn`.
impl<T: ChatModel> ChatModelDyn for T {
    fn name(&self) -> &str {
        ChatModel::name(self)
    }

    fn invoke_boxed<'a>(
        &'a self,
        messages: &'a [ProviderMessage],
        tools: &'a [ToolSpec],
    ) -> Pin<Box<dyn Future<Output = Result<ModelTurn, LlmError>> + Send + 'a>> {
        Box::pin(self.invoke(messages, tools))
    }
}

/// Type-erased chat model for runtime backend selection.
///
/// Since `ChatModel` uses RPITIT, it cannot be used as a trait object
/// directly. `BoxChatModel` provides equivalent methods that delegate to
/// the inner `ChatModelDyn` trait object, and itself implements
/// `ChatModel` so the engine's generic code accepts either.
pub struct BoxChatModel {
    inner: Box<dyn ChatModelDyn + Send + Sync>,
}

impl BoxChatModel {
    /// Wrap a concrete `ChatModel` in a type-erased box.
    pub fn new<T: ChatModel + 'static>(model: T) -> Self {
        Self {
            inner: Box::new(model),
        }
    }
}

impl ChatModel for BoxChatModel {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn invoke(
        &self,
        messages: &[ProviderMessage],
        tools: &[ToolSpec],
    ) -> Result<ModelTurn, LlmError> {
        self.inner.invoke_boxed(messages, tools).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use valet_types::llm::ProviderRole;

    struct EchoModel;

    impl ChatModel for EchoModel {
        fn name(&self) -> &str {
            "echo"
        }

        async fn invoke(
            &self,
            messages: &[ProviderMessage],
            _tools: &[ToolSpec],
        ) -> Result<ModelTurn, LlmError> {
            let last = messages.last().ok_or(LlmError::EmptyResponse)?;
            Ok(ModelTurn::reply(last.content.clone()))
        }
    }

    #[tokio::test]
    async fn test_boxed_model_delegates() {
        let model = BoxChatModel::new(EchoModel);
        assert_eq!(ChatModel::name(&model), "echo");

        let messages = vec![ProviderMessage::new(ProviderRole::User, "ping".to_string())];
        let turn = model.invoke(&messages, &[]).await.unwrap();
        assert_eq!(turn.message.content, "ping");
        assert!(turn.tool_calls.is_empty());
    }
}
