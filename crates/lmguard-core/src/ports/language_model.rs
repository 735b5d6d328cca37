//! Host language model port.
//!
//! This port abstracts the host-provided text-generation capability: an
//! existence probe, an availability probe, and a session constructor that
//! doubles as the download trigger. Implementations live outside the core
//! (browser bindings, native runtimes, or the in-process
//! [`ScriptedHost`](crate::hosts::ScriptedHost)).

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

use super::DownloadProgressPort;
use crate::domain::{Availability, PromptOptions, SessionOptions};

/// Errors reported by the host capability.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HostError {
    /// The host stopped work because the cancellation signal fired.
    #[error("Operation aborted")]
    Aborted,

    /// A rate limit or resource quota was hit.
    #[error("Quota exceeded: {0}")]
    QuotaExceeded(String),

    /// The host does not support the requested configuration.
    #[error("Not supported: {0}")]
    Unsupported(String),

    /// Any other host-side failure.
    #[error("{0}")]
    Failed(String),
}

/// Port for the host's language model capability.
///
/// # Example
///
/// ```ignore
/// let host: Arc<dyn LanguageModelHost> = Arc::new(ScriptedHost::new());
/// if host.is_present() {
///     let tier = host.availability().await?;
///     // ...
/// }
/// ```
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LanguageModelHost: Send + Sync {
    /// Whether the capability exists in this environment at all.
    fn is_present(&self) -> bool;

    /// Current readiness tier.
    async fn availability(&self) -> Result<Availability, HostError>;

    /// Create a session with the given configuration.
    ///
    /// When the model is not downloaded yet, creating a session starts the
    /// download (or attaches to the one in progress) and resolves once the
    /// model is ready. Progress is reported to `monitor` while that happens.
    async fn create_session(
        &self,
        options: SessionOptions,
        monitor: Option<Arc<dyn DownloadProgressPort>>,
    ) -> Result<Box<dyn HostSession>, HostError>;
}

/// A live conversational session owned by the host.
///
/// Not safe for concurrent prompts; the host's conversation state is not
/// designed for interleaved mutation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HostSession: Send + Sync {
    /// Run one generation turn. Implementations should stop early and return
    /// [`HostError::Aborted`] once `options.signal` fires.
    async fn prompt(&self, input: &str, options: &PromptOptions) -> Result<String, HostError>;

    /// Token cost of `input` under this session's tokenizer. Does not consume quota.
    async fn measure_input_usage(&self, input: &str) -> Result<u64, HostError>;

    /// Maximum context size in tokens.
    fn input_quota(&self) -> u64;

    /// Tokens consumed so far, including any pre-charged initial prompts.
    fn input_usage(&self) -> u64;

    /// Release the session's host resources.
    async fn destroy(&self) -> Result<(), HostError>;
}
