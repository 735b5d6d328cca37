//! Cancellation composer.
//!
//! Combines an optional caller signal and an optional timeout into the single
//! effective signal that governs one call. The timeout timer is a spawned task
//! owned by the scope; it is aborted when the scope is cleared or dropped, so
//! no timer outlives the call on any exit path.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::errors::{CancelReason, GuardError};

/// The effective cancellation signal for one call.
///
/// | caller signal | timeout | effective signal                      |
/// |---------------|---------|---------------------------------------|
/// | none          | none    | none                                  |
/// | some          | none    | the caller's signal as-is             |
/// | none          | some    | new token fired by the timer          |
/// | some          | some    | child of the caller's, fired by timer |
///
/// Must be composed inside a Tokio runtime when a timeout is given.
#[derive(Debug)]
pub struct CancellationScope {
    token: Option<CancellationToken>,
    timeout: Option<Duration>,
    timer: Option<JoinHandle<()>>,
    timed_out: Arc<AtomicBool>,
}

impl CancellationScope {
    /// Compose the effective signal and arm the timer, if any.
    pub fn compose(signal: Option<CancellationToken>, timeout: Option<Duration>) -> Self {
        let timed_out = Arc::new(AtomicBool::new(false));

        let Some(after) = timeout else {
            return Self {
                token: signal,
                timeout: None,
                timer: None,
                timed_out,
            };
        };

        // A child fires with its parent but cancelling it leaves the caller's
        // token untouched.
        let token = signal.map_or_else(CancellationToken::new, |parent| parent.child_token());

        let timer_token = token.clone();
        let timer_flag = timed_out.clone();
        let timer = tokio::spawn(async move {
            tokio::select! {
                () = timer_token.cancelled() => {}
                () = tokio::time::sleep(after) => {
                    if !timer_token.is_cancelled() {
                        timer_flag.store(true, Ordering::Release);
                        debug!(timeout = ?after, "Prompt timeout elapsed");
                        timer_token.cancel();
                    }
                }
            }
        });

        Self {
            token: Some(token),
            timeout: Some(after),
            timer: Some(timer),
            timed_out,
        }
    }

    /// The effective signal, if any source was supplied.
    #[must_use]
    pub fn token(&self) -> Option<CancellationToken> {
        self.token.clone()
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.token.as_ref().is_some_and(CancellationToken::is_cancelled)
    }

    /// Whether the timer fired before any other source.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.timed_out.load(Ordering::Acquire)
    }

    /// Whether a timer is still armed.
    #[must_use]
    pub const fn is_timer_armed(&self) -> bool {
        self.timer.is_some()
    }

    /// Cancel the timer without firing the signal. Idempotent.
    pub fn clear(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Clear the timer and attribute a cancellation to its source.
    pub fn finish<T>(mut self, result: Result<T, GuardError>) -> Result<T, GuardError> {
        self.clear();
        result.map_err(|e| self.attribute(e))
    }

    fn attribute(&self, error: GuardError) -> GuardError {
        match (error, self.timeout) {
            (GuardError::Cancelled { .. }, Some(after)) if self.timed_out() => GuardError::Cancelled {
                reason: CancelReason::Timeout {
                    after_ms: u64::try_from(after.as_millis()).unwrap_or(u64::MAX),
                },
            },
            (other, _) => other,
        }
    }
}

impl Drop for CancellationScope {
    fn drop(&mut self) {
        self.clear();
    }
}
