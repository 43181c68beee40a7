//! Token accounting for provider requests.
//!
//! Counts are advisory and may be unknown: when no tokenizer covers the
//! active model, every count is `None` and the unknown propagates through
//! all arithmetic. An unknown total is never coerced to zero.

use valet_types::llm::{ProviderMessage, Tokens};
use valet_types::tool::ToolSpec;

/// Counts tokens in a piece of text for the active model.
///
/// `None` means this counter cannot produce a trustworthy number for the
/// model; callers must treat the whole estimate as unknown.
pub trait TokenCounter: Send + Sync {
    fn count(&self, text: &str) -> Tokens;
}

/// Add two token counts, propagating unknown.
///
/// If either side is `None` the sum is `None`.
pub fn add_tokens(a: Tokens, b: Tokens) -> Tokens {
    match (a, b) {
        (Some(a), Some(b)) => Some(a + b),
        _ => None,
    }
}

/// Estimate the token cost of one provider request.
///
/// Per message: 4 tokens of framing overhead plus the role and content
/// text. A fixed 2 tokens prime the reply, and the serialized tool
/// catalog is charged even when empty.
pub fn estimate_request<C: TokenCounter>(
    counter: &C,
    tools: &[ToolSpec],
    messages: &[ProviderMessage],
) -> Tokens {
    let mut total: Tokens = Some(2);
    for message in messages {
        total = add_tokens(total, Some(4));
        total = add_tokens(total, counter.count(message.role.as_str()));
        total = add_tokens(total, counter.count(&message.content));
    }
    let catalog = match serde_json::to_string(tools) {
        Ok(json) => json,
        Err(_) => return None,
    };
    add_tokens(total, counter.count(&catalog))
}

/// Estimate the token cost of one model response message.
///
/// Same estimator as the request side, applied to the single reply with an
/// empty tool catalog, so both directions price a message identically.
pub fn estimate_response<C: TokenCounter>(counter: &C, message: &ProviderMessage) -> Tokens {
    estimate_request(counter, &[], std::slice::from_ref(message))
}
