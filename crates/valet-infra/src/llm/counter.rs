//! Token counters.
//!
//! `HeuristicTokenCounter` uses a chars/4 approximation, close enough
//! for budget tracking across OpenAI-family models. When even that is
//! unwanted (an unfamiliar model where a wrong number is worse than no
//! number), `DisabledTokenCounter` reports unknown and the running
//! total poisons.

use valet_core::llm::tokens::TokenCounter;
use valet_types::llm::Tokens;

/// Approximate characters per token for English text.
const CHARS_PER_TOKEN: usize = 4;

/// chars/4 approximation, rounded up.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicTokenCounter;

impl TokenCounter for HeuristicTokenCounter {
    fn count(&self, text: &str) -> Tokens {
        Some(text.chars().count().div_ceil(CHARS_PER_TOKEN) as u64)
    }
}

/// Always reports unknown; use when no trustworthy estimate exists for
/// the active model.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledTokenCounter;

impl TokenCounter for DisabledTokenCounter {
    fn count(&self, _text: &str) -> Tokens {
        None
    }
}
