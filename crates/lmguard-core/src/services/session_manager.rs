//! Session manager - creates sessions and scopes their lifetime.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use tracing::{debug, warn};

use crate::domain::{ChatMessage, Instance, SessionOptions};
use crate::errors::GuardError;
use crate::ports::LanguageModelHost;
use crate::session::Session;

/// Merge the instance's system prompt into caller options.
///
/// Prepend-and-append policy: the instance's system message always sits at
/// position zero. A leading system message from the caller is dropped and the
/// messages after it are kept. Without an instance system prompt the caller's
/// options are used verbatim.
#[must_use]
pub fn merge_session_options(instance: &Instance, options: SessionOptions) -> SessionOptions {
    let Some(system_prompt) = instance.system_prompt() else {
        return options;
    };

    let mut merged = options;
    let caller_prompts = std::mem::take(&mut merged.initial_prompts);
    let skip = usize::from(caller_prompts.first().is_some_and(ChatMessage::is_system));

    merged.initial_prompts = std::iter::once(ChatMessage::system(system_prompt))
        .chain(caller_prompts.into_iter().skip(skip))
        .collect();
    merged
}

/// Service that creates sessions against the host.
#[derive(Clone)]
pub struct SessionManager {
    host: Arc<dyn LanguageModelHost>,
}

impl SessionManager {
    pub fn new(host: Arc<dyn LanguageModelHost>) -> Self {
        Self { host }
    }

    /// Create a session with the instance's system prompt merged in.
    pub async fn create_session(
        &self,
        instance: &Instance,
        options: SessionOptions,
    ) -> Result<Session, GuardError> {
        let config = merge_session_options(instance, options);
        debug!(
            instance_id = %instance.id(),
            initial_prompts = config.initial_prompts.len(),
            "Creating session"
        );

        let handle = self
            .host
            .create_session(config.clone(), None)
            .await
            .map_err(|e| GuardError::SessionCreation {
                message: e.to_string(),
            })?;

        Ok(Session::new(handle, config))
    }

    /// Run `callback` with a fresh session and destroy it afterwards.
    ///
    /// The session is destroyed exactly once whether the callback succeeds,
    /// fails, or panics, and before this call returns. If creation fails the
    /// callback never runs. The callback's result always wins: a failed
    /// destroy is logged and otherwise ignored. Should the returned future be
    /// dropped mid-flight, the destroy is handed to the runtime instead.
    pub async fn with_session<T, F, Fut>(
        &self,
        instance: &Instance,
        options: SessionOptions,
        callback: F,
    ) -> Result<T, GuardError>
    where
        F: FnOnce(Session) -> Fut + Send,
        Fut: Future<Output = Result<T, GuardError>> + Send,
        T: Send,
    {
        let session = self.create_session(instance, options).await?;
        let guard = SessionGuard::new(session.clone());

        let outcome = AssertUnwindSafe(callback(session)).catch_unwind().await;

        if let Err(e) = guard.release().await {
            warn!(error = %e, "Scoped session cleanup failed");
        }

        match outcome {
            Ok(result) => result,
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }
}

/// Destroys its session on release, or on drop if never released.
struct SessionGuard {
    session: Option<Session>,
}

impl SessionGuard {
    const fn new(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    async fn release(mut self) -> Result<(), GuardError> {
        match self.session.take() {
            Some(session) => session.destroy().await,
            None => Ok(()),
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        if session.is_destroyed() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(async move {
                    if let Err(e) = session.destroy().await {
                        warn!(error = %e, "Deferred session cleanup failed");
                    }
                });
            }
            Err(_) => warn!(session_id = %session.id(), "No runtime to destroy abandoned session"),
        }
    }
}
