//! `ModelGuard` - the public facade and its two calling conventions.
//!
//! Every operation has one authoritative `safe_*` form returning an
//! [`Outcome`]. The plain form only converts that outcome into a `Result`
//! so callers can use `?`. No logic lives in the plain forms.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::domain::{Availability, Instance, PromptOptions, SessionOptions, TokenUsageInfo};
use crate::errors::GuardError;
use crate::outcome::Outcome;
use crate::ports::LanguageModelHost;
use crate::session::Session;
use crate::settings::GuardSettings;

use super::{InitOptions, InitializeResult, Initializer, PromptService, SessionManager, TokenAccountant};

/// Entry point wrapping a host language model.
///
/// Constructed at the adapter's composition root with a concrete host.
///
/// # Example
///
/// ```ignore
/// let guard = ModelGuard::new(Arc::new(ScriptedHost::new()), GuardSettings::default());
/// let instance = guard.initialize(InitOptions::default()).await?.into_instance()?;
/// let reply = guard
///     .prompt(&instance, "Hello", None, PromptOptions::default(), SessionOptions::default())
///     .await?;
/// ```
#[derive(Clone)]
pub struct ModelGuard {
    settings: GuardSettings,
    initializer: Initializer,
    sessions: SessionManager,
    tokens: TokenAccountant,
    prompts: PromptService,
}

impl ModelGuard {
    pub fn new(host: Arc<dyn LanguageModelHost>, settings: GuardSettings) -> Self {
        let sessions = SessionManager::new(host.clone());
        Self {
            initializer: Initializer::new(host, settings.download_policy),
            tokens: TokenAccountant::new(sessions.clone()),
            prompts: PromptService::new(sessions.clone()),
            sessions,
            settings,
        }
    }

    pub const fn settings(&self) -> &GuardSettings {
        &self.settings
    }

    pub async fn safe_availability(&self) -> Outcome<Availability> {
        self.initializer.availability().await.into()
    }

    pub async fn availability(&self) -> Result<Availability, GuardError> {
        self.safe_availability().await.into_result()
    }

    pub async fn safe_initialize(&self, options: InitOptions) -> Outcome<InitializeResult> {
        self.initializer.initialize(options).await.into()
    }

    pub async fn initialize(&self, options: InitOptions) -> Result<InitializeResult, GuardError> {
        self.safe_initialize(options).await.into_result()
    }

    pub async fn safe_create_session(
        &self,
        instance: &Instance,
        options: SessionOptions,
    ) -> Outcome<Session> {
        self.sessions.create_session(instance, options).await.into()
    }

    pub async fn create_session(
        &self,
        instance: &Instance,
        options: SessionOptions,
    ) -> Result<Session, GuardError> {
        self.safe_create_session(instance, options).await.into_result()
    }

    pub async fn safe_with_session<T, F, Fut>(
        &self,
        instance: &Instance,
        options: SessionOptions,
        callback: F,
    ) -> Outcome<T>
    where
        F: FnOnce(Session) -> Fut + Send,
        Fut: Future<Output = Result<T, GuardError>> + Send,
        T: Send,
    {
        self.sessions
            .with_session(instance, options, callback)
            .await
            .into()
    }

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
        self.safe_with_session(instance, options, callback)
            .await
            .into_result()
    }

    pub async fn safe_check_token_usage(
        &self,
        instance: &Instance,
        prompt: &str,
        options: SessionOptions,
    ) -> Outcome<TokenUsageInfo> {
        self.tokens
            .check_token_usage(instance, prompt, options)
            .await
            .into()
    }

    pub async fn check_token_usage(
        &self,
        instance: &Instance,
        prompt: &str,
        options: SessionOptions,
    ) -> Result<TokenUsageInfo, GuardError> {
        self.safe_check_token_usage(instance, prompt, options)
            .await
            .into_result()
    }

    /// Send one prompt on a throwaway session.
    ///
    /// Without an explicit `timeout` the configured default applies, if any.
    pub async fn safe_prompt(
        &self,
        instance: &Instance,
        text: &str,
        timeout: Option<Duration>,
        options: PromptOptions,
        session_options: SessionOptions,
    ) -> Outcome<String> {
        let timeout = self.settings.effective_prompt_timeout(timeout);
        self.prompts
            .prompt(instance, text, timeout, options, session_options)
            .await
            .into()
    }

    pub async fn prompt(
        &self,
        instance: &Instance,
        text: &str,
        timeout: Option<Duration>,
        options: PromptOptions,
        session_options: SessionOptions,
    ) -> Result<String, GuardError> {
        self.safe_prompt(instance, text, timeout, options, session_options)
            .await
            .into_result()
    }
}
