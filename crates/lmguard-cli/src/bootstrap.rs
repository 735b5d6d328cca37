//! CLI bootstrap - the composition root.
//!
//! The only place where the host is chosen and the guard is assembled.
//! Handlers receive the composed [`CliContext`] and delegate to its guard.

use std::sync::Arc;

use lmguard_core::{
    Availability, GuardSettings, ModelGuard, ScriptedHost, SettingsUpdate, validate_settings,
};
use tracing::debug;

use crate::error::CliError;
use crate::parser::Cli;

/// Bootstrap configuration for the CLI.
#[derive(Debug, Clone)]
pub struct CliConfig {
    /// Availability tier the scripted host starts in.
    pub simulate: Availability,
    /// Guard settings after command-line overrides.
    pub settings: GuardSettings,
}

impl CliConfig {
    /// Create config with default settings and an available model.
    pub const fn with_defaults() -> Self {
        Self {
            simulate: Availability::Available,
            settings: GuardSettings::with_defaults(),
        }
    }

    /// Apply global flags on top of the defaults and validate the result.
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let mut config = Self::with_defaults();
        config.simulate = cli.simulate;
        config.settings.merge(&SettingsUpdate {
            download_policy: cli.download_policy,
            default_prompt_timeout_ms: cli.prompt_timeout_ms.map(Some),
        });
        validate_settings(&config.settings)?;
        Ok(config)
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Fully composed application context for CLI commands.
pub struct CliContext {
    /// The guard facade.
    pub guard: ModelGuard,
    /// The host behind the guard, kept for diagnostics.
    pub host: Arc<ScriptedHost>,
}

impl CliContext {
    /// Access the guard.
    pub const fn guard(&self) -> &ModelGuard {
        &self.guard
    }
}

/// Bootstrap the CLI application.
pub fn bootstrap(config: CliConfig) -> CliContext {
    debug!(
        simulate = %config.simulate,
        policy = %config.settings.download_policy,
        "Bootstrapping scripted host"
    );
    let host = Arc::new(ScriptedHost::new().with_availability(config.simulate));
    let guard = ModelGuard::new(host.clone(), config.settings);
    CliContext { guard, host }
}
