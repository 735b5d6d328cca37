//! Tokens command handler.

use lmguard_core::{GuardError, SessionOptions, TokenUsageInfo};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::handlers::{print_outcome, ready_instance};
use crate::presentation::{DownloadBar, render_token_usage};

/// Measure `text` against a fresh session and print the budget.
pub async fn execute(
    ctx: &CliContext,
    text: &str,
    system: Option<String>,
    json: bool,
) -> Result<(), CliError> {
    let result = run(ctx, text, system).await;
    if json {
        return print_outcome(result);
    }
    print!("{}", render_token_usage(&result?));
    Ok(())
}

pub async fn run(
    ctx: &CliContext,
    text: &str,
    system: Option<String>,
) -> Result<TokenUsageInfo, GuardError> {
    let bar = DownloadBar::new();
    let instance = ready_instance(ctx, system, &bar).await?;
    ctx.guard()
        .check_token_usage(&instance, text, SessionOptions::default())
        .await
}
