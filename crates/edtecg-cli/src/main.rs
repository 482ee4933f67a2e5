//! edtecg - command-line client for the EDTECG flashcard service.
//!
//! A thin shell over `edtecg-http`: every command builds one client, runs a
//! single call through the session-instrumented pipeline and prints the
//! result.

mod cli;
mod commands;
mod context;
mod output;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use cli::{Cli, Commands};
use commands::{auth, files, flashcards, mocks};
use context::AppContext;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    init_logging(cli.verbose, cli.json_logs);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output::error(&format!("{:#}", err));
            if context::requires_login(&err) {
                eprintln!("Run 'edtecg auth login' to sign in again.");
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(&cli.global)?;

    match cli.command {
        Commands::Auth(cmd) => auth::handle(&ctx, cmd).await,
        Commands::Flashcards(cmd) => flashcards::handle(&ctx, cmd).await,
        Commands::Files(cmd) => files::handle(&ctx, cmd).await,
        Commands::Mocks(cmd) => mocks::handle(&ctx, cmd).await,
    }
}

fn init_logging(verbosity: u8, json: bool) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if json {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
            .init();
    }
}
