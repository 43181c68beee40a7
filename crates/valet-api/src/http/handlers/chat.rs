//! Synchronous chat turn handler.

use axum::Json;
use axum::extract::State;

use valet_types::chat::{ChatReply, ChatRequest};

use crate::http::error::AppError;
use crate::state::AppState;

/// POST /chat - run one chat turn.
///
/// A `null` convoID starts a new conversation; the generated id comes
/// back in the reply for the client to reuse.
pub async fn chat(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Result<Json<ChatReply>, AppError> {
    let reply = state
        .chat_service()
        .handle(body.convo_id, body.message)
        .await?;
    Ok(Json(reply))
}
