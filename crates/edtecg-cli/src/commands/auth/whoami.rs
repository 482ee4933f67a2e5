//! Whoami command implementation.

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct WhoamiArgs {}

pub fn run(ctx: &AppContext, _args: WhoamiArgs) -> Result<()> {
    ctx.require_login("/")?;

    let session = ctx.client.session();
    let has_refresh = session.refresh_token().is_some();

    output::field("API", ctx.api_url.as_str());
    output::field("Store", &ctx.store_path.display().to_string());
    output::field("Authenticated", "yes");
    output::field("Refresh token", if has_refresh { "present" } else { "missing" });

    Ok(())
}
