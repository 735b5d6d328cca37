//! Live session handle.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;
use uuid::Uuid;

use crate::domain::{PromptOptions, SessionOptions, TokenUsageInfo};
use crate::errors::{CancelReason, GuardError};
use crate::ports::{HostError, HostSession};

/// A stateful conversation bound to one merged configuration.
///
/// Cloning yields another handle to the same host session. The session does
/// not reference the instance it was created from. Once destroyed (through
/// any handle) every further call fails with [`GuardError::SessionDestroyed`].
///
/// Sessions are not safe for concurrent prompts; callers must not run two
/// operations on the same session at once.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    id: Uuid,
    config: SessionOptions,
    host: Box<dyn HostSession>,
    destroyed: AtomicBool,
}

impl Session {
    pub(crate) fn new(host: Box<dyn HostSession>, config: SessionOptions) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                id: Uuid::new_v4(),
                config,
                host,
                destroyed: AtomicBool::new(false),
            }),
        }
    }

    #[must_use]
    pub fn id(&self) -> Uuid {
        self.inner.id
    }

    /// The merged configuration the session was created with.
    #[must_use]
    pub fn config(&self) -> &SessionOptions {
        &self.inner.config
    }

    #[must_use]
    pub fn is_destroyed(&self) -> bool {
        self.inner.destroyed.load(Ordering::Acquire)
    }

    fn ensure_live(&self) -> Result<&dyn HostSession, GuardError> {
        if self.is_destroyed() {
            return Err(GuardError::SessionDestroyed);
        }
        Ok(self.inner.host.as_ref())
    }

    /// Run one generation turn against the conversation.
    pub async fn prompt(&self, input: &str, options: &PromptOptions) -> Result<String, GuardError> {
        let host = self.ensure_live()?;
        host.prompt(input, options).await.map_err(|e| match e {
            HostError::Aborted => GuardError::Cancelled {
                reason: CancelReason::Aborted,
            },
            other => GuardError::Generation {
                message: other.to_string(),
            },
        })
    }

    /// Token cost of `input`, without consuming quota.
    pub async fn measure_input_usage(&self, input: &str) -> Result<u64, GuardError> {
        let host = self.ensure_live()?;
        host.measure_input_usage(input)
            .await
            .map_err(|e| GuardError::TokenMeasurement {
                message: e.to_string(),
            })
    }

    /// Maximum context size reported by the host.
    pub fn input_quota(&self) -> Result<u64, GuardError> {
        Ok(self.ensure_live()?.input_quota())
    }

    /// Tokens consumed so far, as reported by the host.
    pub fn input_usage(&self) -> Result<u64, GuardError> {
        Ok(self.ensure_live()?.input_usage())
    }

    /// Budget snapshot for `input` against this session's current usage.
    pub async fn token_usage(&self, input: &str) -> Result<TokenUsageInfo, GuardError> {
        let prompt_tokens = self.measure_input_usage(input).await?;
        let max_tokens = self.input_quota()?;
        let tokens_so_far = self.input_usage()?;
        Ok(TokenUsageInfo::new(prompt_tokens, max_tokens, tokens_so_far))
    }

    /// Destroy the host session.
    ///
    /// Only the first call reaches the host; later calls are no-ops.
    pub async fn destroy(&self) -> Result<(), GuardError> {
        if self.inner.destroyed.swap(true, Ordering::AcqRel) {
            return Ok(());
        }
        debug!(session_id = %self.inner.id, "Destroying session");
        self.inner
            .host
            .destroy()
            .await
            .map_err(|e| GuardError::SessionDestroy {
                message: e.to_string(),
            })
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.inner.id)
            .field("config", &self.inner.config)
            .field("destroyed", &self.is_destroyed())
            .finish_non_exhaustive()
    }
}
