//! Mock exam subcommands.

mod manage;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};

use crate::context::AppContext;
use crate::output;

const ROUTE: &str = "/mocks";

#[derive(Args, Debug)]
pub struct MocksCommand {
    #[command(subcommand)]
    pub command: MocksSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum MocksSubcommand {
    /// List available languages
    Languages,

    /// List mocks
    List {
        /// Print full JSON instead of a summary
        #[arg(long)]
        json: bool,
    },

    /// Show one mock with its questions
    Show {
        id: u64,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Show your current score on a mock
    Score { id: u64 },

    /// Submit an answer to a question
    Submit {
        id: u64,

        #[arg(long)]
        question: u64,

        #[arg(long)]
        answer: u64,
    },

    /// Create a mock from a JSON question file
    Create(manage::CreateArgs),

    /// Update language, question count or questions
    Update(manage::UpdateArgs),

    /// Delete a mock
    Delete { id: u64 },
}

pub async fn handle(ctx: &AppContext, cmd: MocksCommand) -> Result<()> {
    ctx.require_login(ROUTE)?;
    let mocks = ctx.client.mocks();

    match cmd.command {
        MocksSubcommand::Languages => {
            let languages = mocks.languages().await.context("Failed to list languages")?;
            for language in &languages {
                println!("{:>6}  {}", language.id, language.language_name);
            }
            Ok(())
        }
        MocksSubcommand::List { json } => {
            let all = mocks.list().await.context("Failed to list mocks")?;
            if json {
                return output::json_lines(&all, false, "No mocks found.");
            }
            if all.is_empty() {
                output::note("No mocks found.");
            }
            for mock in &all {
                println!(
                    "{:>6}  {}  {}  ({} questions)",
                    mock.id,
                    mock.name_mock,
                    mock.language_name.as_deref().unwrap_or("-"),
                    mock.number_of_questions
                );
            }
            Ok(())
        }
        MocksSubcommand::Show { id, pretty } => {
            let mock = mocks.get(id).await.context("Failed to fetch mock")?;
            output::json(&mock, pretty)
        }
        MocksSubcommand::Score { id } => {
            let score = mocks.score(id).await.context("Failed to fetch score")?;
            output::field("Score", &score.to_string());
            Ok(())
        }
        MocksSubcommand::Submit {
            id,
            question,
            answer,
        } => {
            let correct = mocks
                .submit(id, question, answer)
                .await
                .context("Failed to submit answer")?;
            if correct {
                output::success("Correct");
            } else {
                output::error("Incorrect");
            }
            Ok(())
        }
        MocksSubcommand::Create(args) => manage::create(ctx, args).await,
        MocksSubcommand::Update(args) => manage::update(ctx, args).await,
        MocksSubcommand::Delete { id } => {
            mocks.delete(id).await.context("Failed to delete mock")?;
            output::success(&format!("Mock {} deleted", id));
            Ok(())
        }
    }
}
