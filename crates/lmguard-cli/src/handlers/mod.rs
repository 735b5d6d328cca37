//! Command handlers that delegate to the guard.
//!
//! Handlers follow one pattern:
//! - `execute(ctx, ...)` parses CLI input, calls the guard, prints the result
//! - `run(ctx, ...)` holds the guard calls and returns the raw result, so it
//!   can be tested without capturing stdout
//!
//! Handlers should NOT contain guard logic of their own.

pub mod prompt;
pub mod status;
pub mod tokens;

use lmguard_core::{GuardError, InitOptions, InitializeResult, Instance, Outcome};
use serde::Serialize;
use tracing::info;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::DownloadBar;

/// Initialize an instance, downloading the model if the host requires it.
///
/// Under the deferred policy the CLI is the one deciding when the download
/// starts, so it triggers it right away.
pub async fn ready_instance(
    ctx: &CliContext,
    system_prompt: Option<String>,
    bar: &DownloadBar,
) -> Result<Instance, GuardError> {
    let mut options = InitOptions::default().with_download_progress(bar.callback());
    options.system_prompt = system_prompt;

    let result = ctx.guard().initialize(options).await;
    bar.finish();
    match result? {
        InitializeResult::Ready(instance) => Ok(instance),
        InitializeResult::NeedsDownload(pending) => {
            info!("Model download deferred; triggering it now");
            let instance = pending.trigger().await;
            bar.finish();
            instance
        }
    }
}

/// Print an outcome envelope as JSON and turn failures into an exit code.
pub fn print_outcome<T: Serialize>(result: Result<T, GuardError>) -> Result<(), CliError> {
    let outcome = Outcome::from(result);
    println!("{}", serde_json::to_string_pretty(&outcome)?);
    outcome.into_result().map(|_| ()).map_err(CliError::from)
}
