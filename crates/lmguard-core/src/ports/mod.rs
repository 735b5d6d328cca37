//! Port definitions (trait abstractions) for the host environment.
//!
//! Ports define the interfaces the guard expects from the host. They contain
//! no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - The host is always injected, never looked up from ambient state
//! - Host failures are reported as [`HostError`] and mapped by the services
//! - Conversational state and quota counters stay inside the host session

pub mod download_progress;
pub mod language_model;

pub use download_progress::{DownloadProgressPort, NoopDownloadProgress, PercentForwarder, ProgressCallback};
pub use language_model::{HostError, HostSession, LanguageModelHost};

#[cfg(test)]
pub use language_model::{MockHostSession, MockLanguageModelHost};
