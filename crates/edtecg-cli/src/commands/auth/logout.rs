//! Logout command implementation.

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(ctx: &AppContext, _args: LogoutArgs) -> Result<()> {
    ctx.client.session().logout();
    output::success("Logged out");
    Ok(())
}
