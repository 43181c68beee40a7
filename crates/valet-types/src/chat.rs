//! Chat request/response types and errors for the conversation surface.

use serde::{Deserialize, Serialize};

use crate::llm::LlmError;

/// Request body for a synchronous chat turn.
///
/// A `null` conversation id creates a new session; the freshly generated
/// id is returned in the reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "convoID")]
    pub convo_id: Option<String>,
    pub message: String,
}

/// Reply for a chat turn.
///
/// `message` is `None` when the final assistant message resolves to no
/// textual content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatReply {
    #[serde(rename = "convoID")]
    pub convo_id: String,
    pub message: Option<String>,
}

/// Errors from handling a chat turn.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("nothing to reply")]
    EmptyMessage,

    #[error("cannot find your conversation")]
    ConversationNotFound,

    #[error("cannot find your message")]
    NoReply,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_request_wire_field_names() {
        let req: ChatRequest =
            serde_json::from_str(r#"{"convoID": null, "message": "hi"}"#).unwrap();
        assert!(req.convo_id.is_none());
        assert_eq!(req.message, "hi");
    }

    #[test]
    fn test_chat_reply_wire_field_names() {
        let reply = ChatReply {
            convo_id: "1718000000000".to_string(),
            message: Some("hello".to_string()),
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains(r#""convoID":"1718000000000""#));
    }

    #[test]
    fn test_chat_reply_null_message() {
        let reply = ChatReply {
            convo_id: "1".to_string(),
            message: None,
        };
        let json = serde_json::to_string(&reply).unwrap();
        assert!(json.contains(r#""message":null"#));
    }

    #[test]
    fn test_chat_error_display() {
        assert_eq!(ChatError::EmptyMessage.to_string(), "nothing to reply");
        assert_eq!(
            ChatError::ConversationNotFound.to_string(),
            "cannot find your conversation"
        );
    }
}
