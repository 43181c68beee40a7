//! Application state wiring all services together.
//!
//! The engine is generic over its traits; AppState pins them to the
//! concrete infra implementations.

use std::sync::Arc;

use secrecy::SecretString;

use valet_core::agent::assistant::Assistant;
use valet_core::chat::registry::ConversationRegistry;
use valet_core::chat::service::ChatService;
use valet_core::event::EventBroadcaster;
use valet_core::llm::box_model::BoxChatModel;
use valet_infra::instruction::DEFAULT_INSTRUCTION;
use valet_infra::llm::counter::HeuristicTokenCounter;
use valet_infra::llm::openai::OpenAiChatModel;
use valet_infra::tool::default_registry;
use valet_types::config::ValetConfig;

/// Concrete type alias for the assistant pinned to infra implementations.
pub type ConcreteAssistant = Assistant<HeuristicTokenCounter>;

/// Shared application state for the REST API handlers.
#[derive(Clone)]
pub struct AppState {
    chat_service: Arc<ChatService<ConcreteAssistant>>,
    assistant: Arc<ConcreteAssistant>,
    broadcaster: Arc<EventBroadcaster>,
}

impl AppState {
    /// Wire the assistant, conversation registry, and broadcaster.
    pub fn init(config: ValetConfig, api_key: SecretString) -> anyhow::Result<Self> {
        let model = OpenAiChatModel::new(api_key, config.base_url.clone(), config.model.clone())?;
        let assistant = Arc::new(Assistant::new(
            BoxChatModel::new(model),
            default_registry(),
            HeuristicTokenCounter,
            DEFAULT_INSTRUCTION,
        ));

        let registry = ConversationRegistry::new(config.conversation);
        let chat_service = Arc::new(ChatService::new(Arc::clone(&assistant), registry));

        Ok(Self {
            chat_service,
            assistant,
            broadcaster: Arc::new(EventBroadcaster::new()),
        })
    }

    pub fn chat_service(&self) -> &ChatService<ConcreteAssistant> {
        &self.chat_service
    }

    pub fn assistant(&self) -> Arc<ConcreteAssistant> {
        Arc::clone(&self.assistant)
    }

    pub fn broadcaster(&self) -> Arc<EventBroadcaster> {
        Arc::clone(&self.broadcaster)
    }
}
