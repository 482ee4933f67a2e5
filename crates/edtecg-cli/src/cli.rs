//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use edtecg_http::DEFAULT_API_URL;

use crate::commands::auth::AuthCommand;
use crate::commands::files::FilesCommand;
use crate::commands::flashcards::FlashcardsCommand;
use crate::commands::mocks::MocksCommand;

/// Command-line client for the EDTECG flashcard and quiz service.
#[derive(Parser, Debug)]
#[command(name = "edtecg")]
#[command(author, version = env!("EDTECG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Connection and storage options shared by every command.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// API base URL
    #[arg(long, env = "EDTECG_API_URL", default_value = DEFAULT_API_URL, global = true)]
    pub api_url: String,

    /// Request timeout in milliseconds
    #[arg(long, env = "EDTECG_API_TIMEOUT_MS", default_value_t = 5000, global = true)]
    pub timeout_ms: u64,

    /// Credential file (defaults to the user data directory)
    #[arg(long, env = "EDTECG_STORE", global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Account and session operations
    Auth(AuthCommand),

    /// Flashcard collections and cards
    Flashcards(FlashcardsCommand),

    /// Uploaded study files
    Files(FilesCommand),

    /// Mock exams
    Mocks(MocksCommand),
}
