//! Card commands.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Collection to add the card to
    #[arg(long)]
    pub collection: u64,

    #[arg(long)]
    pub word: String,

    #[arg(long)]
    pub meaning: String,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Card ID
    pub id: u64,

    #[arg(long)]
    pub word: String,

    #[arg(long)]
    pub meaning: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Card ID
    pub id: u64,
}

pub async fn add(ctx: &AppContext, args: AddArgs) -> Result<()> {
    let card = ctx
        .client
        .flashcards()
        .add(args.collection, &args.word, &args.meaning)
        .await
        .context("Failed to add flashcard")?;

    output::success("Flashcard added");
    output::field("ID", &card.id.to_string());
    Ok(())
}

pub async fn update(ctx: &AppContext, args: UpdateArgs) -> Result<()> {
    let card = ctx
        .client
        .flashcards()
        .update(args.id, &args.word, &args.meaning)
        .await
        .context("Failed to update flashcard")?;

    output::success("Flashcard updated");
    output::field("Word", &card.word);
    output::field("Meaning", &card.meaning);
    Ok(())
}

pub async fn delete(ctx: &AppContext, args: DeleteArgs) -> Result<()> {
    ctx.client
        .flashcards()
        .delete(args.id)
        .await
        .context("Failed to delete flashcard")?;

    output::success(&format!("Flashcard {} deleted", args.id));
    Ok(())
}
