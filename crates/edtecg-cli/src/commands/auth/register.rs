//! Register command implementation.

use anyhow::{Context, Result};
use clap::Args;

use edtecg_core::RegisterRequest;

use crate::context::AppContext;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// Full name shown on the account
    #[arg(long)]
    pub full_name: String,

    /// Account username
    #[arg(long)]
    pub username: String,

    /// Account password
    #[arg(long, env = "EDTECG_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Password confirmation (defaults to --password)
    #[arg(long)]
    pub confirm_password: Option<String>,
}

pub async fn run(ctx: &AppContext, args: RegisterArgs) -> Result<()> {
    let confirm = args.confirm_password.as_deref().unwrap_or(&args.password);
    let data = RegisterRequest::new(&args.full_name, &args.username, &args.password, confirm);

    output::note("Creating account...");

    ctx.client
        .session()
        .register(&data)
        .await
        .context("Failed to register")?;

    output::success("Account created");
    output::field("Username", &args.username);
    output::note("Run 'edtecg auth login' to sign in.");

    Ok(())
}
