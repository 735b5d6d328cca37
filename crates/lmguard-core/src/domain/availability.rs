//! Availability tiers and download types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Readiness tier reported by the host once the capability is known to exist.
///
/// An absent capability is not a tier: it is reported by
/// [`LanguageModelHost::is_present`](crate::ports::LanguageModelHost::is_present).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    /// The capability exists but cannot be used on this device.
    Unavailable,
    /// The model can be used once it has been downloaded.
    Downloadable,
    /// A download is already in progress.
    Downloading,
    /// The model is ready for sessions.
    Available,
}

impl Availability {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Downloadable => "downloadable",
            Self::Downloading => "downloading",
            Self::Available => "available",
        }
    }

    /// Whether reaching `Available` requires a download step.
    #[must_use]
    pub const fn needs_download(&self) -> bool {
        matches!(self, Self::Downloadable | Self::Downloading)
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unavailable" => Ok(Self::Unavailable),
            "downloadable" => Ok(Self::Downloadable),
            "downloading" => Ok(Self::Downloading),
            "available" => Ok(Self::Available),
            other => Err(format!("unknown availability: {other}")),
        }
    }
}

/// How `initialize` handles a `downloadable` model.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DownloadPolicy {
    /// Start the download within the `initialize` call.
    #[default]
    Inline,
    /// Hand back a trigger so the caller decides when the download starts
    /// (hosts that only allow downloads after a user gesture).
    Deferred,
}

impl fmt::Display for DownloadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline => f.write_str("inline"),
            Self::Deferred => f.write_str("deferred"),
        }
    }
}

impl FromStr for DownloadPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Ok(Self::Inline),
            "deferred" => Ok(Self::Deferred),
            other => Err(format!("unknown download policy: {other}")),
        }
    }
}

/// A download-progress event emitted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadProgress {
    /// Bytes loaded so far.
    pub loaded: u64,
    /// Total bytes expected.
    pub total: u64,
}

impl DownloadProgress {
    #[must_use]
    pub const fn new(loaded: u64, total: u64) -> Self {
        Self { loaded, total }
    }

    /// Bytes loaded so far scaled to a 0-100 percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.loaded as f64 / self.total as f64 * 100.0).clamp(0.0, 100.0)
    }
}
