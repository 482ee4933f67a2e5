//! Account and session subcommands.

mod login;
mod logout;
mod refresh_token;
mod register;
mod whoami;

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in and store the token pair
    Login(login::LoginArgs),

    /// Create a new account
    Register(register::RegisterArgs),

    /// Forget the stored token pair
    Logout(logout::LogoutArgs),

    /// Display the stored session
    Whoami(whoami::WhoamiArgs),

    /// Exchange the refresh token for a new pair
    RefreshToken(refresh_token::RefreshTokenArgs),
}

pub async fn handle(ctx: &AppContext, cmd: AuthCommand) -> Result<()> {
    match cmd.command {
        AuthSubcommand::Login(args) => login::run(ctx, args).await,
        AuthSubcommand::Register(args) => register::run(ctx, args).await,
        AuthSubcommand::Logout(args) => logout::run(ctx, args),
        AuthSubcommand::Whoami(args) => whoami::run(ctx, args),
        AuthSubcommand::RefreshToken(args) => refresh_token::run(ctx, args).await,
    }
}
