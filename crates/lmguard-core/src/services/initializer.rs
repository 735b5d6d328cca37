//! Availability state machine.
//!
//! Drives the host from an unknown tier to a ready [`Instance`]:
//!
//! ```text
//! absent        -> CapabilityAbsent
//! unavailable   -> CapabilityUnavailable
//! available     -> Ready(instance)
//! downloading   -> attach, wait, re-probe -> Ready | NotReadyAfterDownload
//! downloadable  -> inline:   download, re-probe -> Ready | ...
//!                  deferred: NeedsDownload(pending)
//! ```
//!
//! Nothing here retries; every failure is reported once.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::{Availability, DownloadPolicy, Instance, SessionOptions};
use crate::errors::GuardError;
use crate::outcome::Outcome;
use crate::ports::{DownloadProgressPort, LanguageModelHost, PercentForwarder, ProgressCallback};

/// Inputs to `initialize`.
#[derive(Clone, Default)]
pub struct InitOptions {
    /// Persistent system instruction stamped on the instance.
    pub system_prompt: Option<String>,
    /// Receives download progress as a 0-100 percentage.
    pub on_download_progress: Option<ProgressCallback>,
}

impl InitOptions {
    #[must_use]
    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    #[must_use]
    pub fn with_download_progress(mut self, callback: ProgressCallback) -> Self {
        self.on_download_progress = Some(callback);
        self
    }
}

impl fmt::Debug for InitOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InitOptions")
            .field("system_prompt", &self.system_prompt)
            .field("on_download_progress", &self.on_download_progress.is_some())
            .finish()
    }
}

/// Result of `initialize`.
#[derive(Debug)]
pub enum InitializeResult {
    /// The model is ready.
    Ready(Instance),
    /// The model must be downloaded; the caller decides when.
    NeedsDownload(PendingDownload),
}

impl InitializeResult {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// The instance, or [`GuardError::DownloadRequired`] if a download is pending.
    pub fn into_instance(self) -> Result<Instance, GuardError> {
        match self {
            Self::Ready(instance) => Ok(instance),
            Self::NeedsDownload(_) => Err(GuardError::DownloadRequired),
        }
    }
}

/// A download that runs only when the caller triggers it.
pub struct PendingDownload {
    host: Arc<dyn LanguageModelHost>,
    options: InitOptions,
}

impl PendingDownload {
    /// Run the download step and produce a ready instance.
    pub async fn safe_trigger(self) -> Outcome<Instance> {
        download_and_confirm(self.host.as_ref(), self.options).await.into()
    }

    /// [`Self::safe_trigger`], as a `Result`.
    pub async fn trigger(self) -> Result<Instance, GuardError> {
        self.safe_trigger().await.into_result()
    }
}

impl fmt::Debug for PendingDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingDownload")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// Service that verifies the host and produces instances.
#[derive(Clone)]
pub struct Initializer {
    host: Arc<dyn LanguageModelHost>,
    policy: DownloadPolicy,
}

impl Initializer {
    pub fn new(host: Arc<dyn LanguageModelHost>, policy: DownloadPolicy) -> Self {
        Self { host, policy }
    }

    /// Probe the current availability tier.
    pub async fn availability(&self) -> Result<Availability, GuardError> {
        probe(self.host.as_ref()).await
    }

    /// Verify the host and produce an instance, downloading per policy.
    pub async fn initialize(&self, options: InitOptions) -> Result<InitializeResult, GuardError> {
        let availability = self.availability().await?;
        debug!(%availability, policy = %self.policy, "Probed language model");

        match (availability, self.policy) {
            (Availability::Unavailable, _) => Err(GuardError::CapabilityUnavailable),
            (Availability::Available, _) => Ok(InitializeResult::Ready(ready(options))),
            (Availability::Downloadable, DownloadPolicy::Deferred) => {
                info!("Model download deferred until triggered");
                Ok(InitializeResult::NeedsDownload(PendingDownload {
                    host: self.host.clone(),
                    options,
                }))
            }
            (Availability::Downloadable | Availability::Downloading, _) => {
                download_and_confirm(self.host.as_ref(), options)
                    .await
                    .map(InitializeResult::Ready)
            }
        }
    }
}

async fn probe(host: &dyn LanguageModelHost) -> Result<Availability, GuardError> {
    if !host.is_present() {
        warn!("Language model capability is not present");
        return Err(GuardError::CapabilityAbsent);
    }
    host.availability().await.map_err(|e| GuardError::Probe {
        message: e.to_string(),
    })
}

fn ready(options: InitOptions) -> Instance {
    let instance = Instance::new(options.system_prompt);
    info!(instance_id = %instance.id(), "Language model ready");
    instance
}

/// Start (or attach to) the download, then require a final `available`.
async fn download_and_confirm(
    host: &dyn LanguageModelHost,
    options: InitOptions,
) -> Result<Instance, GuardError> {
    info!("Starting model download");
    let monitor = options
        .on_download_progress
        .clone()
        .map(|callback| Arc::new(PercentForwarder::new(callback)) as Arc<dyn DownloadProgressPort>);

    // A throwaway session forces the host to begin or join the download.
    let session = host
        .create_session(SessionOptions::default(), monitor)
        .await
        .map_err(|e| GuardError::DownloadFailed {
            message: e.to_string(),
        })?;
    if let Err(e) = session.destroy().await {
        warn!(error = %e, "Failed to destroy download session");
    }

    match probe(host).await? {
        Availability::Available => Ok(ready(options)),
        availability => {
            warn!(%availability, "Model not available after download");
            Err(GuardError::NotReadyAfterDownload { availability })
        }
    }
}
