//! CLI-specific error types and mappings.
//!
//! Maps guard errors to exit codes and user-facing messages.

use lmguard_core::{GuardError, SettingsError};
use thiserror::Error;

/// CLI-specific error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// The model cannot be used here at all.
    #[error("{0}")]
    Unavailable(String),

    /// The call was cancelled by timeout or Ctrl-C.
    #[error("{0}")]
    Cancelled(String),

    /// Any other guard failure.
    #[error("{0}")]
    Guard(String),

    /// Argument or settings validation error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(String),
}

impl CliError {
    /// Map error to an exit code.
    ///
    /// Exit codes follow sysexits.h where one fits:
    /// - 1: General error
    /// - 69: Service unavailable
    /// - 75: Temporary failure (cancelled, retry may succeed)
    /// - 78: Configuration error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Guard(_) | Self::Output(_) => 1,
            Self::Unavailable(_) => 69, // EX_UNAVAILABLE
            Self::Cancelled(_) => 75,   // EX_TEMPFAIL
            Self::Config(_) => 78,      // EX_CONFIG
        }
    }
}

impl From<GuardError> for CliError {
    fn from(err: GuardError) -> Self {
        match err {
            GuardError::CapabilityAbsent
            | GuardError::CapabilityUnavailable
            | GuardError::NotReadyAfterDownload { .. } => Self::Unavailable(err.to_string()),
            GuardError::Cancelled { .. } => Self::Cancelled(err.to_string()),
            other => Self::Guard(other.to_string()),
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        Self::Output(err.to_string())
    }
}
