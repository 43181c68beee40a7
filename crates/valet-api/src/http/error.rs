//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use valet_types::chat::ChatError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    Chat(ChatError),
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Chat(ChatError::EmptyMessage) => (
                StatusCode::BAD_REQUEST,
                "EMPTY_MESSAGE",
                ChatError::EmptyMessage.to_string(),
            ),
            AppError::Chat(ChatError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                ChatError::ConversationNotFound.to_string(),
            ),
            AppError::Chat(ChatError::NoReply) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "NO_REPLY",
                ChatError::NoReply.to_string(),
            ),
            AppError::Chat(ChatError::Llm(e)) => {
                (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR", e.to_string())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}
