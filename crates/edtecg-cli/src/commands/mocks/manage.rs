//! Mock creation and editing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use edtecg_http::api::{MockUpdate, NewMock, QuizQuestion};

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Mock name
    #[arg(long)]
    pub name: String,

    #[arg(long)]
    pub user_id: u64,

    #[arg(long)]
    pub language_id: u64,

    /// JSON file holding an array of questions with their answers
    #[arg(long)]
    pub questions: PathBuf,

    /// Number of questions asked per attempt (defaults to all)
    #[arg(long)]
    pub number_of_questions: Option<u32>,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    pub id: u64,

    #[arg(long)]
    pub language_id: Option<u64>,

    #[arg(long)]
    pub number_of_questions: Option<u32>,

    /// JSON file replacing the question list
    #[arg(long)]
    pub questions: Option<PathBuf>,
}

fn read_questions(path: &Path) -> Result<Vec<QuizQuestion>> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&json).with_context(|| format!("Invalid question file {}", path.display()))
}

pub async fn create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let questions = read_questions(&args.questions)?;
    let mock = NewMock {
        name: args.name,
        user_id: args.user_id,
        language_id: args.language_id,
        number_of_questions: args
            .number_of_questions
            .unwrap_or(questions.len() as u32),
        questions,
    };

    let created = ctx
        .client
        .mocks()
        .create(&mock)
        .await
        .context("Failed to create mock")?;

    output::success("Mock created");
    output::field("ID", &created.id.to_string());
    output::field("Name", &created.name_mock);
    Ok(())
}

pub async fn update(ctx: &AppContext, args: UpdateArgs) -> Result<()> {
    let update = MockUpdate {
        language_id: args.language_id,
        number_of_questions: args.number_of_questions,
        questions: args.questions.as_deref().map(read_questions).transpose()?,
    };

    let updated = ctx
        .client
        .mocks()
        .update(args.id, &update)
        .await
        .context("Failed to update mock")?;

    output::success("Mock updated");
    output::field("Questions", &updated.number_of_questions.to_string());
    Ok(())
}
