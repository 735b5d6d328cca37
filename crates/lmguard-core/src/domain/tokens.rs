//! Token budget snapshot.

use serde::{Deserialize, Serialize};

/// Whether a prompt fits in a session's remaining context.
///
/// Recomputed on every call; `tokens_so_far` moves as the session is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsageInfo {
    /// Cost of the candidate prompt.
    pub prompt_tokens: u64,
    /// Maximum context size of the session.
    pub max_tokens: u64,
    /// Tokens already consumed by the session.
    pub tokens_so_far: u64,
    /// `max_tokens - tokens_so_far`.
    pub tokens_available: u64,
    /// `prompt_tokens <= tokens_available`.
    pub will_fit: bool,
}

impl TokenUsageInfo {
    /// Derive the remaining budget and fit flag from host-reported counters.
    ///
    /// A host reporting more usage than quota yields a zero budget.
    #[must_use]
    pub const fn new(prompt_tokens: u64, max_tokens: u64, tokens_so_far: u64) -> Self {
        let tokens_available = max_tokens.saturating_sub(tokens_so_far);
        Self {
            prompt_tokens,
            max_tokens,
            tokens_so_far,
            tokens_available,
            will_fit: prompt_tokens <= tokens_available,
        }
    }
}
