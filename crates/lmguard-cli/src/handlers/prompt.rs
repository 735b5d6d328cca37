//! Prompt command handler.
//!
//! Sends one prompt on a throwaway session. Ctrl-C cancels the caller
//! signal, which the guard combines with the optional timeout.

use std::time::Duration;

use lmguard_core::{CancellationToken, GuardError, PromptOptions, SessionOptions};
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{print_outcome, ready_instance};
use crate::presentation::DownloadBar;

/// Arguments for the prompt command.
#[derive(Debug, Clone, Default)]
pub struct PromptArgs {
    pub text: String,
    pub system: Option<String>,
    pub timeout_ms: Option<u64>,
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub json: bool,
}

impl PromptArgs {
    fn session_options(&self) -> SessionOptions {
        let mut options = SessionOptions::default();
        if let Some(temperature) = self.temperature {
            options = options.with_temperature(temperature);
        }
        if let Some(top_k) = self.top_k {
            options = options.with_top_k(top_k);
        }
        options
    }
}

/// Execute the prompt command.
pub async fn execute(ctx: &CliContext, args: PromptArgs) -> Result<(), CliError> {
    let signal = CancellationToken::new();
    let interrupt = {
        let signal = signal.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("Interrupted, cancelling prompt");
                signal.cancel();
            }
        })
    };

    let result = run(ctx, &args, signal).await;
    interrupt.abort();

    if args.json {
        return print_outcome(result);
    }
    println!("{}", result?);
    Ok(())
}

pub async fn run(
    ctx: &CliContext,
    args: &PromptArgs,
    signal: CancellationToken,
) -> Result<String, GuardError> {
    let bar = DownloadBar::new();
    let instance = ready_instance(ctx, args.system.clone(), &bar).await?;

    ctx.guard()
        .prompt(
            &instance,
            &args.text,
            args.timeout_ms.map(Duration::from_millis),
            PromptOptions::default().with_signal(signal),
            args.session_options(),
        )
        .await
}
