//! Download progress port.
//!
//! The host emits [`DownloadProgress`] events into this port while a model
//! download runs; the guard adapts them to the caller's percentage callback.

use std::fmt;
use std::sync::Arc;

use crate::domain::DownloadProgress;

/// Caller-supplied progress callback receiving a 0-100 percentage.
pub type ProgressCallback = Arc<dyn Fn(f64) + Send + Sync>;

/// Port for receiving download progress events.
///
/// This method should not block.
pub trait DownloadProgressPort: Send + Sync {
    fn emit(&self, progress: DownloadProgress);
}

/// A no-op sink for contexts that do not report progress.
#[derive(Debug, Clone, Default)]
pub struct NoopDownloadProgress;

impl DownloadProgressPort for NoopDownloadProgress {
    fn emit(&self, _progress: DownloadProgress) {}
}

/// Forwards progress to a [`ProgressCallback`] as a percentage.
#[derive(Clone)]
pub struct PercentForwarder {
    callback: ProgressCallback,
}

impl PercentForwarder {
    pub fn new(callback: ProgressCallback) -> Self {
        Self { callback }
    }
}

impl fmt::Debug for PercentForwarder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PercentForwarder").finish_non_exhaustive()
    }
}

impl DownloadProgressPort for PercentForwarder {
    fn emit(&self, progress: DownloadProgress) {
        (self.callback)(progress.percent());
    }
}
