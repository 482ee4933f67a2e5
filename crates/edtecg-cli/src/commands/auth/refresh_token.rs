//! Refresh token command implementation.

use anyhow::{Context, Result, bail};
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct RefreshTokenArgs {}

pub async fn run(ctx: &AppContext, _args: RefreshTokenArgs) -> Result<()> {
    if ctx.client.session().refresh_token().is_none() {
        bail!("No active session. Run 'edtecg auth login' first.");
    }

    output::note("Refreshing session...");

    ctx.client
        .session()
        .refresh()
        .await
        .context("Failed to refresh session")?;

    output::success("Session refreshed successfully");

    Ok(())
}
