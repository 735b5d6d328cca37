//! Error types surfaced by the guard.
//!
//! These errors are serializable and carry host causes as strings, so they can
//! travel inside an [`Outcome`](crate::Outcome) across FFI or JSON boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Availability;

/// Why a prompt was cancelled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "by", rename_all = "snake_case")]
pub enum CancelReason {
    /// The per-call timeout elapsed first.
    Timeout { after_ms: u64 },
    /// The caller's signal fired, or the host aborted on its own.
    Aborted,
}

impl std::fmt::Display for CancelReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Timeout { after_ms } => write!(f, "timed out after {after_ms}ms"),
            Self::Aborted => f.write_str("aborted"),
        }
    }
}

/// Error type for every guard operation.
#[derive(Clone, Debug, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuardError {
    /// The environment has no language model capability at all.
    #[error("Language model capability is not present in this environment")]
    CapabilityAbsent,

    /// The capability exists but reports itself unusable.
    #[error("Language model is unavailable on this device")]
    CapabilityUnavailable,

    /// The availability query itself failed.
    #[error("Failed to query model availability: {message}")]
    Probe { message: String },

    /// The download step could not complete.
    #[error("Model download failed: {message}")]
    DownloadFailed { message: String },

    /// The download step returned but the model still is not ready.
    #[error("Model still not available after download attempt (reported {availability})")]
    NotReadyAfterDownload { availability: Availability },

    /// A deferred initialization was unwrapped before its download ran.
    #[error("Model must be downloaded first; trigger the pending download")]
    DownloadRequired,

    /// The host refused to create a session.
    #[error("Failed to create session: {message}")]
    SessionCreation { message: String },

    /// The session was used after it was destroyed.
    #[error("Session has already been destroyed")]
    SessionDestroyed,

    /// The host failed to tear a session down.
    #[error("Failed to destroy session: {message}")]
    SessionDestroy { message: String },

    /// The generation call failed.
    #[error("Prompt failed: {message}")]
    Generation { message: String },

    /// The generation call was cancelled.
    #[error("Prompt cancelled: {reason}")]
    Cancelled { reason: CancelReason },

    /// Measuring a prompt's token cost failed.
    #[error("Failed to measure token usage: {message}")]
    TokenMeasurement { message: String },

    /// A scoped-session callback reported its own failure.
    #[error("{message}")]
    Callback { message: String },
}

impl GuardError {
    /// Wrap an arbitrary callback failure.
    pub fn callback(message: impl std::fmt::Display) -> Self {
        Self::Callback {
            message: message.to_string(),
        }
    }

    /// Stable snake_case tag, identical to the serialized `kind`.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::CapabilityAbsent => "capability_absent",
            Self::CapabilityUnavailable => "capability_unavailable",
            Self::Probe { .. } => "probe",
            Self::DownloadFailed { .. } => "download_failed",
            Self::NotReadyAfterDownload { .. } => "not_ready_after_download",
            Self::DownloadRequired => "download_required",
            Self::SessionCreation { .. } => "session_creation",
            Self::SessionDestroyed => "session_destroyed",
            Self::SessionDestroy { .. } => "session_destroy",
            Self::Generation { .. } => "generation",
            Self::Cancelled { .. } => "cancelled",
            Self::TokenMeasurement { .. } => "token_measurement",
            Self::Callback { .. } => "callback",
        }
    }

    /// Returns true if calling the operation again may succeed without any
    /// change to the host environment.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Probe { .. }
                | Self::DownloadFailed { .. }
                | Self::NotReadyAfterDownload { .. }
                | Self::SessionCreation { .. }
                | Self::Generation { .. }
                | Self::Cancelled { .. }
                | Self::TokenMeasurement { .. }
        )
    }

    #[must_use]
    pub const fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
