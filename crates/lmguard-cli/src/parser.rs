//! Main CLI parser and top-level argument handling.
//!
//! This module defines the root CLI structure with global options.

use clap::Parser;
use lmguard_core::{Availability, DownloadPolicy};

use crate::commands::Commands;

/// Command-line interface for the lmguard wrapper.
///
/// Global options select how the scripted host behaves and which settings
/// the guard runs with; subcommands pick the operation.
#[derive(Parser)]
#[command(name = "lmguard")]
#[command(about = "Probe, download and prompt a guarded language model")]
#[command(version)]
pub struct Cli {
    /// Availability tier the scripted host starts in
    #[arg(
        long,
        global = true,
        env = "LMGUARD_SIMULATE",
        default_value_t = Availability::Available
    )]
    pub simulate: Availability,

    /// What initialize does when the model must be downloaded
    #[arg(long = "download-policy", global = true, env = "LMGUARD_DOWNLOAD_POLICY")]
    pub download_policy: Option<DownloadPolicy>,

    /// Default prompt timeout in milliseconds
    #[arg(long = "prompt-timeout-ms", global = true, env = "LMGUARD_PROMPT_TIMEOUT_MS")]
    pub prompt_timeout_ms: Option<u64>,

    /// Enable verbose/debug output
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}
