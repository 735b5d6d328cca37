//! Deterministic in-process host.
//!
//! Tokenizes on whitespace, echoes prompts back (or runs a custom responder),
//! simulates downloads with progress events, honors cancellation signals, and
//! counts every session it creates and destroys.

use std::fmt;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{Availability, DownloadProgress, PromptOptions, SessionOptions};
use crate::ports::{DownloadProgressPort, HostError, HostSession, LanguageModelHost};

/// Default context size of scripted sessions.
pub const DEFAULT_INPUT_QUOTA: u64 = 4096;

/// Bytes a simulated download reports as its total.
const SIMULATED_MODEL_BYTES: u64 = 1 << 30;

/// Produces a reply for `(input, session config)`.
pub type Responder = Arc<dyn Fn(&str, &SessionOptions) -> String + Send + Sync>;

/// Snapshot of the host's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScriptedHostStats {
    pub sessions_created: usize,
    pub sessions_destroyed: usize,
    pub prompts: usize,
    pub downloads: usize,
}

#[derive(Default)]
struct Counters {
    sessions_created: AtomicUsize,
    sessions_destroyed: AtomicUsize,
    prompts: AtomicUsize,
    downloads: AtomicUsize,
}

struct State {
    availability: Availability,
    after_download: Availability,
    download_steps: u64,
    download_error: Option<String>,
    session_error: Option<HostError>,
    last_options: Option<SessionOptions>,
}

/// A scripted [`LanguageModelHost`].
///
/// # Example
///
/// ```
/// use lmguard_core::domain::Availability;
/// use lmguard_core::hosts::ScriptedHost;
///
/// let host = ScriptedHost::new()
///     .with_availability(Availability::Downloadable)
///     .with_download_steps(4);
/// assert_eq!(host.stats().downloads, 0);
/// ```
pub struct ScriptedHost {
    present: bool,
    input_quota: u64,
    response_delay: Duration,
    responder: Responder,
    state: Mutex<State>,
    counters: Arc<Counters>,
}

impl ScriptedHost {
    /// A present host whose model is already available.
    pub fn new() -> Self {
        Self {
            present: true,
            input_quota: DEFAULT_INPUT_QUOTA,
            response_delay: Duration::ZERO,
            responder: Arc::new(|input, _| format!("echo: {input}")),
            state: Mutex::new(State {
                availability: Availability::Available,
                after_download: Availability::Available,
                download_steps: 2,
                download_error: None,
                session_error: None,
                last_options: None,
            }),
            counters: Arc::new(Counters::default()),
        }
    }

    /// A host without the capability at all.
    #[must_use]
    pub fn absent() -> Self {
        Self {
            present: false,
            ..Self::new()
        }
    }

    #[must_use]
    pub fn with_availability(self, availability: Availability) -> Self {
        self.lock().availability = availability;
        self
    }

    /// Tier reported once a simulated download finishes.
    #[must_use]
    pub fn with_availability_after_download(self, availability: Availability) -> Self {
        self.lock().after_download = availability;
        self
    }

    /// Number of progress events after the initial zero event.
    #[must_use]
    pub fn with_download_steps(self, steps: u64) -> Self {
        self.lock().download_steps = steps;
        self
    }

    #[must_use]
    pub fn with_download_failure(self, message: impl Into<String>) -> Self {
        self.lock().download_error = Some(message.into());
        self
    }

    /// Fail every session construction once the model is available.
    #[must_use]
    pub fn with_session_failure(self, error: HostError) -> Self {
        self.lock().session_error = Some(error);
        self
    }

    #[must_use]
    pub const fn with_input_quota(mut self, quota: u64) -> Self {
        self.input_quota = quota;
        self
    }

    /// Delay before each reply; the delay is cut short by the prompt's signal.
    #[must_use]
    pub const fn with_response_delay(mut self, delay: Duration) -> Self {
        self.response_delay = delay;
        self
    }

    #[must_use]
    pub fn with_responder(mut self, responder: Responder) -> Self {
        self.responder = responder;
        self
    }

    /// Change the reported tier at runtime.
    pub fn set_availability(&self, availability: Availability) {
        self.lock().availability = availability;
    }

    pub fn stats(&self) -> ScriptedHostStats {
        ScriptedHostStats {
            sessions_created: self.counters.sessions_created.load(Ordering::SeqCst),
            sessions_destroyed: self.counters.sessions_destroyed.load(Ordering::SeqCst),
            prompts: self.counters.prompts.load(Ordering::SeqCst),
            downloads: self.counters.downloads.load(Ordering::SeqCst),
        }
    }

    /// Configuration of the most recently created session.
    pub fn last_session_options(&self) -> Option<SessionOptions> {
        self.lock().last_options.clone()
    }

    /// Whitespace token count used for all measurements.
    #[must_use]
    pub fn count_tokens(text: &str) -> u64 {
        text.split_whitespace().count() as u64
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn simulate_download(
        &self,
        monitor: Option<&Arc<dyn DownloadProgressPort>>,
    ) -> Result<(), HostError> {
        self.counters.downloads.fetch_add(1, Ordering::SeqCst);
        let steps = {
            let state = self.lock();
            if let Some(message) = &state.download_error {
                return Err(HostError::Failed(message.clone()));
            }
            state.download_steps.max(1)
        };

        if let Some(monitor) = monitor {
            for step in 0..=steps {
                monitor.emit(DownloadProgress::new(
                    SIMULATED_MODEL_BYTES * step / steps,
                    SIMULATED_MODEL_BYTES,
                ));
            }
        }

        let mut state = self.lock();
        state.availability = state.after_download;
        debug!(availability = %state.availability, "Simulated download finished");
        Ok(())
    }
}

impl Default for ScriptedHost {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ScriptedHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScriptedHost")
            .field("present", &self.present)
            .field("availability", &self.lock().availability)
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl LanguageModelHost for ScriptedHost {
    fn is_present(&self) -> bool {
        self.present
    }

    async fn availability(&self) -> Result<Availability, HostError> {
        Ok(self.lock().availability)
    }

    async fn create_session(
        &self,
        options: SessionOptions,
        monitor: Option<Arc<dyn DownloadProgressPort>>,
    ) -> Result<Box<dyn HostSession>, HostError> {
        let availability = self.lock().availability;
        match availability {
            Availability::Unavailable => {
                return Err(HostError::Unsupported("model is unavailable".to_string()));
            }
            Availability::Downloadable | Availability::Downloading => {
                self.simulate_download(monitor.as_ref())?;
            }
            Availability::Available => {}
        }

        {
            let mut state = self.lock();
            if let Some(error) = &state.session_error {
                return Err(error.clone());
            }
            state.last_options = Some(options.clone());
        }

        let precharged: u64 = options
            .initial_prompts
            .iter()
            .map(|m| Self::count_tokens(&m.content))
            .sum();
        if precharged > self.input_quota {
            return Err(HostError::QuotaExceeded(format!(
                "initial prompts use {precharged} of {} tokens",
                self.input_quota
            )));
        }

        self.counters.sessions_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(ScriptedSession {
            options,
            quota: self.input_quota,
            usage: AtomicU64::new(precharged),
            delay: self.response_delay,
            responder: self.responder.clone(),
            counters: self.counters.clone(),
        }))
    }
}

struct ScriptedSession {
    options: SessionOptions,
    quota: u64,
    usage: AtomicU64,
    delay: Duration,
    responder: Responder,
    counters: Arc<Counters>,
}

#[async_trait]
impl HostSession for ScriptedSession {
    async fn prompt(&self, input: &str, options: &PromptOptions) -> Result<String, HostError> {
        self.counters.prompts.fetch_add(1, Ordering::SeqCst);

        if !self.delay.is_zero() {
            match &options.signal {
                Some(signal) => {
                    tokio::select! {
                        () = signal.cancelled() => return Err(HostError::Aborted),
                        () = tokio::time::sleep(self.delay) => {}
                    }
                }
                None => tokio::time::sleep(self.delay).await,
            }
        }
        if options.signal.as_ref().is_some_and(|s| s.is_cancelled()) {
            return Err(HostError::Aborted);
        }

        let cost = ScriptedHost::count_tokens(input);
        let used = self.usage.load(Ordering::SeqCst);
        if used + cost > self.quota {
            return Err(HostError::QuotaExceeded(format!(
                "prompt needs {cost} tokens, {} left",
                self.quota.saturating_sub(used)
            )));
        }

        let reply = (self.responder)(input, &self.options);
        let total = (cost + ScriptedHost::count_tokens(&reply)).min(self.quota - used);
        self.usage.fetch_add(total, Ordering::SeqCst);
        Ok(reply)
    }

    async fn measure_input_usage(&self, input: &str) -> Result<u64, HostError> {
        Ok(ScriptedHost::count_tokens(input))
    }

    fn input_quota(&self) -> u64 {
        self.quota
    }

    fn input_usage(&self) -> u64 {
        self.usage.load(Ordering::SeqCst)
    }

    async fn destroy(&self) -> Result<(), HostError> {
        self.counters.sessions_destroyed.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
