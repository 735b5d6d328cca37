//! CLI entry point - the composition root.
//!
//! Parses arguments, bootstraps the guard and dispatches to handlers.

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use lmguard_cli::handlers::prompt::PromptArgs;
use lmguard_cli::{Cli, CliConfig, CliError, Commands, bootstrap, handlers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its `env` fallbacks
    dotenvy::dotenv().ok();

    let mut cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(command) = cli.command.take() else {
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(err) = dispatch(&cli, command).await {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
    Ok(())
}

async fn dispatch(cli: &Cli, command: Commands) -> Result<(), CliError> {
    let ctx = bootstrap(CliConfig::from_cli(cli)?);

    match command {
        Commands::Status => handlers::status::execute(&ctx).await,
        Commands::Prompt {
            text,
            system,
            timeout_ms,
            temperature,
            top_k,
            json,
        } => {
            let args = PromptArgs {
                text,
                system,
                timeout_ms,
                temperature,
                top_k,
                json,
            };
            handlers::prompt::execute(&ctx, args).await
        }
        Commands::Tokens { text, system, json } => {
            handlers::tokens::execute(&ctx, &text, system, json).await
        }
    }
}
