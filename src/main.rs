// ABOUTME: Entry point for the vsi CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;
use vsi::config::{Config, InitOptions};
use vsi::error::Result;
use vsi::output::{Output, OutputMode};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let mode = output_mode(&cli);
    let result = run(cli, mode).await;

    if let Err(e) = result {
        Output::new(mode).error(&e.to_string());
        std::process::exit(1);
    }
}

fn output_mode(cli: &Cli) -> OutputMode {
    match cli.command {
        Commands::Status { json: true } => OutputMode::Json,
        _ if cli.quiet => OutputMode::Quiet,
        _ => OutputMode::Normal,
    }
}

async fn run(cli: Cli, mode: OutputMode) -> Result<()> {
    let path = Config::resolve_path(cli.config.as_deref())?;

    match cli.command {
        Commands::Config {
            access_key_id,
            access_key,
            profile,
            zone,
            bucket,
            force,
        } => {
            let options = InitOptions {
                access_key_id,
                access_key,
                profile,
                zone,
                bucket,
            };
            commands::write_config(&path, &options, force, &Output::new(mode))
        }
        Commands::Status { .. } => {
            let config = Config::load(&path)?;
            commands::status(config, Output::new(mode)).await
        }
        Commands::Install => {
            let config = Config::load(&path)?;
            commands::install(config, Output::new(mode)).await
        }
    }
}
