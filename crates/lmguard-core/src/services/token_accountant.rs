//! Token accountant - budget checks on a throwaway session.

use crate::domain::{Instance, SessionOptions, TokenUsageInfo};
use crate::errors::GuardError;

use super::SessionManager;

/// Computes whether a prompt fits a fresh session's context budget.
#[derive(Clone)]
pub struct TokenAccountant {
    sessions: SessionManager,
}

impl TokenAccountant {
    pub const fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    /// Open a scoped session, measure `prompt`, and destroy the session.
    ///
    /// Usage counters come from the host as-is, so any pre-charged system
    /// prompt shows up in `tokens_so_far`.
    pub async fn check_token_usage(
        &self,
        instance: &Instance,
        prompt: &str,
        options: SessionOptions,
    ) -> Result<TokenUsageInfo, GuardError> {
        let prompt = prompt.to_string();
        self.sessions
            .with_session(instance, options, |session| async move {
                session.token_usage(&prompt).await
            })
            .await
    }
}
