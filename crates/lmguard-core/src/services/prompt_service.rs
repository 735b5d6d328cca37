//! Single-prompt operation.

use std::time::Duration;

use tracing::debug;

use crate::domain::{Instance, PromptOptions, SessionOptions};
use crate::errors::GuardError;

use super::{CancellationScope, SessionManager};

/// Runs one prompt on a session that lives only for the call.
///
/// Callers wanting conversational continuity should hold a
/// [`Session`](crate::Session) instead.
#[derive(Clone)]
pub struct PromptService {
    sessions: SessionManager,
}

impl PromptService {
    pub const fn new(sessions: SessionManager) -> Self {
        Self { sessions }
    }

    /// Open a scoped session, issue exactly one generation call, and return its text.
    ///
    /// The effective signal combines `timeout` with `options.signal`. The
    /// timer is cleared and the session destroyed before this returns,
    /// whatever the outcome. No retries.
    pub async fn prompt(
        &self,
        instance: &Instance,
        text: &str,
        timeout: Option<Duration>,
        options: PromptOptions,
        session_options: SessionOptions,
    ) -> Result<String, GuardError> {
        let text = text.to_string();
        self.sessions
            .with_session(instance, session_options, |session| async move {
                let scope = CancellationScope::compose(options.signal.clone(), timeout);
                let options = PromptOptions {
                    signal: scope.token(),
                    ..options
                };

                debug!(
                    session_id = %session.id(),
                    timeout = ?timeout,
                    "Sending prompt"
                );
                let result = session.prompt(&text, &options).await;
                scope.finish(result)
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::CancelReason;
    use crate::ports::{HostError, MockHostSession, MockLanguageModelHost};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio_util::sync::CancellationToken;

    fn echo_session(destroys: Arc<AtomicUsize>) -> MockHostSession {
        let mut session = MockHostSession::new();
        session
            .expect_prompt()
            .returning(|input, _| Ok(format!("echo: {input}")));
        session.expect_destroy().returning(move || {
            destroys.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });
        session
    }

    fn service_with(session: MockHostSession) -> PromptService {
        let mut host = MockLanguageModelHost::new();
        host.expect_create_session()
            .times(1)
            .return_once(move |_, _| Ok(Box::new(session)));
        PromptService::new(SessionManager::new(Arc::new(host)))
    }

    #[tokio::test]
    async fn test_prompt_returns_text_and_destroys_session() {
        let destroys = Arc::new(AtomicUsize::new(0));
        let service = service_with(echo_session(destroys.clone()));

        let text = service
            .prompt(
                &Instance::new(None),
                "hi",
                None,
                PromptOptions::default(),
                SessionOptions::default(),
            )
            .await
            .unwrap();

        assert_eq!(text, "echo: hi");
        assert_eq!(destroys.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_effective_signal_is_substituted() {
        let caller = CancellationToken::new();
        let caller_for_check = caller.clone();

        let mut session = MockHostSession::new();
        session.expect_prompt().returning(move |_, options| {
            let signal = options.signal.as_ref().expect("effective signal");
            // With a timeout the host sees a child token, not the caller's own.
            caller_for_check.cancel();
            if signal.is_cancelled() {
                Err(HostError::Aborted)
            } else {
                Ok(String::new())
            }
        });
        session.expect_destroy().returning(|| Ok(()));

        let service = service_with(session);
        let result = service
            .prompt(
                &Instance::new(None),
                "hi",
                Some(Duration::from_secs(30)),
                PromptOptions::default().with_signal(caller),
                SessionOptions::default(),
            )
            .await;

        assert_eq!(
            result,
            Err(GuardError::Cancelled {
                reason: CancelReason::Aborted
            })
        );
    }

    #[tokio::test]
    async fn test_response_constraint_passes_through() {
        let mut session = MockHostSession::new();
        session
            .expect_prompt()
            .withf(|_, options| {
                options.response_constraint == Some(serde_json::json!({ "type": "boolean" }))
            })
            .returning(|_, _| Ok("true".to_string()));
        session.expect_destroy().returning(|| Ok(()));

        let service = service_with(session);
        let text = service
            .prompt(
                &Instance::new(None),
                "is rust fun?",
                None,
                PromptOptions::default()
                    .with_response_constraint(serde_json::json!({ "type": "boolean" })),
                SessionOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(text, "true");
    }
}
