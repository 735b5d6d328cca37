//! Status command handler.

use lmguard_core::{Availability, GuardError};

use crate::bootstrap::CliContext;
use crate::error::CliError;
use crate::presentation::render_availability;

/// Probe the model and print its tier with the active settings.
pub async fn execute(ctx: &CliContext) -> Result<(), CliError> {
    let availability = run(ctx).await?;
    print!("{}", render_availability(availability, ctx.guard().settings()));
    Ok(())
}

pub async fn run(ctx: &CliContext) -> Result<Availability, GuardError> {
    ctx.guard().availability().await
}
