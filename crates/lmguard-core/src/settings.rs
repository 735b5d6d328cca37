//! Guard settings and validation.
//!
//! Pure configuration types with no infrastructure dependencies. Adapters
//! load them from wherever they like (flags, env, files) and validate them
//! before constructing a [`ModelGuard`](crate::ModelGuard).

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::domain::DownloadPolicy;

/// Upper bound accepted for `default_prompt_timeout_ms` (one hour).
pub const MAX_PROMPT_TIMEOUT_MS: u64 = 60 * 60 * 1000;

/// Guard settings.
///
/// All fields have graceful defaults so partial documents deserialize.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GuardSettings {
    /// How `initialize` treats a `downloadable` model.
    pub download_policy: DownloadPolicy,

    /// Timeout applied to `prompt` calls that do not pass their own.
    pub default_prompt_timeout_ms: Option<u64>,
}

impl GuardSettings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            download_policy: DownloadPolicy::Inline,
            default_prompt_timeout_ms: None,
        }
    }

    /// The timeout a prompt runs under: the caller's, else the configured default.
    #[must_use]
    pub fn effective_prompt_timeout(&self, requested: Option<Duration>) -> Option<Duration> {
        requested.or_else(|| self.default_prompt_timeout_ms.map(Duration::from_millis))
    }

    /// Merge an update into these settings, only touching fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(policy) = other.download_policy {
            self.download_policy = policy;
        }
        if let Some(timeout) = other.default_prompt_timeout_ms {
            self.default_prompt_timeout_ms = timeout;
        }
    }
}

/// Partial settings update.
///
/// `Option<Option<T>>` fields follow the usual convention:
/// - `None` = don't change this field
/// - `Some(None)` = clear the field
/// - `Some(Some(value))` = set the field
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub download_policy: Option<DownloadPolicy>,
    pub default_prompt_timeout_ms: Option<Option<u64>>,
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Prompt timeout must be between 1 and {MAX_PROMPT_TIMEOUT_MS} ms, got {0}")]
    InvalidPromptTimeout(u64),
}

/// Validate settings values.
pub fn validate_settings(settings: &GuardSettings) -> Result<(), SettingsError> {
    if let Some(timeout) = settings.default_prompt_timeout_ms {
        if !(1..=MAX_PROMPT_TIMEOUT_MS).contains(&timeout) {
            return Err(SettingsError::InvalidPromptTimeout(timeout));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = GuardSettings::with_defaults();
        assert_eq!(settings.download_policy, DownloadPolicy::Inline);
        assert_eq!(settings.default_prompt_timeout_ms, None);
        assert_eq!(settings, GuardSettings::default());
        assert!(validate_settings(&settings).is_ok());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let settings = GuardSettings {
            default_prompt_timeout_ms: Some(0),
            ..Default::default()
        };
        assert_eq!(
            validate_settings(&settings),
            Err(SettingsError::InvalidPromptTimeout(0))
        );
    }

    #[test]
    fn test_caller_timeout_wins_over_default() {
        let settings = GuardSettings {
            default_prompt_timeout_ms: Some(5_000),
            ..Default::default()
        };
        assert_eq!(
            settings.effective_prompt_timeout(Some(Duration::from_millis(10))),
            Some(Duration::from_millis(10))
        );
        assert_eq!(
            settings.effective_prompt_timeout(None),
            Some(Duration::from_secs(5))
        );
        assert_eq!(GuardSettings::default().effective_prompt_timeout(None), None);
    }

    #[test]
    fn test_merge_update() {
        let mut settings = GuardSettings {
            default_prompt_timeout_ms: Some(1_000),
            ..Default::default()
        };
        settings.merge(&SettingsUpdate {
            download_policy: Some(DownloadPolicy::Deferred),
            default_prompt_timeout_ms: Some(None),
        });
        assert_eq!(settings.download_policy, DownloadPolicy::Deferred);
        assert_eq!(settings.default_prompt_timeout_ms, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: GuardSettings =
            serde_json::from_str(r#"{ "download_policy": "deferred" }"#).unwrap();
        assert_eq!(settings.download_policy, DownloadPolicy::Deferred);
        assert_eq!(settings.default_prompt_timeout_ms, None);
    }
}
