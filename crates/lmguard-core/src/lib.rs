#![doc = include_str!(concat!(env!("OUT_DIR"), "/README_GENERATED.md"))]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod errors;
pub mod hosts;
pub mod outcome;
pub mod ports;
pub mod services;
pub mod session;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    Availability, ChatMessage, DownloadPolicy, DownloadProgress, Instance, MessageRole,
    PromptOptions, SessionOptions, TokenUsageInfo,
};
pub use errors::{CancelReason, GuardError};
pub use hosts::{ScriptedHost, ScriptedHostStats};
pub use outcome::Outcome;
pub use ports::{
    DownloadProgressPort, HostError, HostSession, LanguageModelHost, NoopDownloadProgress,
    PercentForwarder, ProgressCallback,
};
pub use services::{
    CancellationScope, InitOptions, InitializeResult, ModelGuard, PendingDownload,
    merge_session_options,
};
pub use session::Session;
pub use settings::{GuardSettings, SettingsError, SettingsUpdate, validate_settings};

// The cancellation primitive is part of the public API.
pub use tokio_util::sync::CancellationToken;
