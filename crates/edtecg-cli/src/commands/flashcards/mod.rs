//! Flashcard subcommands.

mod cards;
mod collections;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;

const ROUTE: &str = "/flashcards";

#[derive(Args, Debug)]
pub struct FlashcardsCommand {
    #[command(subcommand)]
    pub command: FlashcardsSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum FlashcardsSubcommand {
    /// List collections
    List(collections::ListArgs),

    /// Show one collection with its cards
    Show(collections::ShowArgs),

    /// Create a collection
    CreateCollection(collections::CreateArgs),

    /// Delete a collection
    DeleteCollection(collections::DeleteArgs),

    /// Add a card to a collection
    Add(cards::AddArgs),

    /// Change the word and meaning of a card
    Update(cards::UpdateArgs),

    /// Delete a card
    Delete(cards::DeleteArgs),
}

pub async fn handle(ctx: &AppContext, cmd: FlashcardsCommand) -> Result<()> {
    ctx.require_login(ROUTE)?;

    match cmd.command {
        FlashcardsSubcommand::List(args) => collections::list(ctx, args).await,
        FlashcardsSubcommand::Show(args) => collections::show(ctx, args).await,
        FlashcardsSubcommand::CreateCollection(args) => collections::create(ctx, args).await,
        FlashcardsSubcommand::DeleteCollection(args) => collections::delete(ctx, args).await,
        FlashcardsSubcommand::Add(args) => cards::add(ctx, args).await,
        FlashcardsSubcommand::Update(args) => cards::update(ctx, args).await,
        FlashcardsSubcommand::Delete(args) => cards::delete(ctx, args).await,
    }
}
