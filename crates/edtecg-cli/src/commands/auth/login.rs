//! Login command implementation.

use anyhow::{Context, Result};
use clap::Args;

use edtecg_core::LoginRequest;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "EDTECG_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(ctx: &AppContext, args: LoginArgs) -> Result<()> {
    let credentials = LoginRequest::new(&args.username, &args.password);

    output::note("Logging in...");

    ctx.client
        .session()
        .login(&credentials)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Username", &args.username);
    output::field("API", ctx.api_url.as_str());

    Ok(())
}
