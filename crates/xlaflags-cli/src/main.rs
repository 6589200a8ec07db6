//! CLI entry point.
//!
//! Loads `.env`, sets up logging on stderr so stdout carries only the
//! requested output, then dispatches to a handler.

use std::io;

use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use xlaflags_cli::{Cli, CliError, Commands, handlers};

/// Initialize tracing on stderr.
///
/// Log level priority: `RUST_LOG` > `--verbose` (debug) > default (warn).
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .compact()
        .try_init()
        .ok(); // Ignore error if already initialized
}

fn run(command: Commands) -> Result<(), CliError> {
    let mut out = io::stdout().lock();
    match command {
        Commands::Options { resolve, format } => {
            handlers::options::execute(&resolve, format, &mut out)
        }
        Commands::Flags { resolve } => handlers::flags::execute(&resolve, &mut out),
        Commands::Env { resolve, target } => {
            handlers::env::execute(&resolve, target.into(), &mut out)
        }
        Commands::Versions => handlers::versions::execute(&mut out),
    }
}

fn main() -> anyhow::Result<()> {
    // Load environment variables before clap reads its env fallbacks
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let Some(command) = cli.command else {
        // No command provided - show help
        Cli::command().print_help()?;
        return Ok(());
    };

    if let Err(err) = run(command) {
        eprintln!("Error: {err}");
        std::process::exit(err.exit_code());
    }
    Ok(())
}
