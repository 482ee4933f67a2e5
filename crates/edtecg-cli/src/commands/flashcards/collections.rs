//! Collection commands.

use anyhow::{Context, Result};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Print full JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Collection ID
    pub id: u64,

    /// Pretty-print JSON output
    #[arg(long)]
    pub pretty: bool,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Collection name
    pub name: String,

    /// Owner of the new collection
    #[arg(long)]
    pub user_id: u64,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Collection ID
    pub id: u64,
}

pub async fn list(ctx: &AppContext, args: ListArgs) -> Result<()> {
    let collections = ctx
        .client
        .flashcards()
        .collections()
        .await
        .context("Failed to list collections")?;

    if args.json {
        return output::json_lines(&collections, false, "No collections found.");
    }

    if collections.is_empty() {
        output::note("No collections found.");
    }
    for collection in &collections {
        println!(
            "{:>6}  {}  ({} cards)",
            collection.id, collection.name, collection.number_of_flashcards
        );
    }
    Ok(())
}

pub async fn show(ctx: &AppContext, args: ShowArgs) -> Result<()> {
    let collection = ctx
        .client
        .flashcards()
        .collection(args.id)
        .await
        .context("Failed to fetch collection")?;

    output::json(&collection, args.pretty)
}

pub async fn create(ctx: &AppContext, args: CreateArgs) -> Result<()> {
    let collection = ctx
        .client
        .flashcards()
        .create_collection(&args.name, args.user_id)
        .await
        .context("Failed to create collection")?;

    output::success("Collection created");
    output::field("ID", &collection.id.to_string());
    output::field("Name", &collection.name);
    Ok(())
}

pub async fn delete(ctx: &AppContext, args: DeleteArgs) -> Result<()> {
    ctx.client
        .flashcards()
        .delete_collection(args.id)
        .await
        .context("Failed to delete collection")?;

    output::success(&format!("Collection {} deleted", args.id));
    Ok(())
}
