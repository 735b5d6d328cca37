//! Subcommand definitions.

use clap::Subcommand;

/// Available commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Probe the model and print its availability
    Status,

    /// Send one prompt on a throwaway session
    Prompt {
        /// Text to send
        text: String,
        /// System prompt attached to the instance
        #[arg(short, long)]
        system: Option<String>,
        /// Abort the prompt after this many milliseconds
        #[arg(short = 't', long = "timeout-ms")]
        timeout_ms: Option<u64>,
        /// Sampling temperature passed to the host
        #[arg(long)]
        temperature: Option<f32>,
        /// Top-k sampling passed to the host
        #[arg(long = "top-k")]
        top_k: Option<u32>,
        /// Print the outcome envelope as JSON
        #[arg(long)]
        json: bool,
    },

    /// Measure a prompt against the context budget of a fresh session
    Tokens {
        /// Text to measure
        text: String,
        /// System prompt attached to the instance
        #[arg(short, long)]
        system: Option<String>,
        /// Print the outcome envelope as JSON
        #[arg(long)]
        json: bool,
    },
}
